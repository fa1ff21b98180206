//! Printer wrapper that remembers toggle state
//!
//! Underline and smoothing stay active on the printer until switched off.
//! [`TrackedPrinter`] remembers the last value it sent for each and skips
//! writes that would not change anything. Everything else is forwarded to
//! the wrapped [`Printer`] through `Deref`.

use std::ops::{Deref, DerefMut};

use crate::encoding::{CharacterConverter, TableConverter};
use crate::error::PrintResult;
use crate::printer::Printer;
use crate::transport::Transport;

#[derive(Debug)]
pub struct TrackedPrinter<T: Transport, C: CharacterConverter = TableConverter> {
    inner: Printer<T, C>,
    underline: Option<bool>,
    smooth: Option<bool>,
}

impl<T: Transport, C: CharacterConverter> TrackedPrinter<T, C> {
    /// Wrap a printer whose toggle state is unknown
    pub fn new(inner: Printer<T, C>) -> Self {
        Self {
            inner,
            underline: None,
            smooth: None,
        }
    }

    /// Initialize the printer; both toggles are off after a reset
    pub fn init(&mut self) -> PrintResult<()> {
        self.forget();
        self.inner.init()?;
        self.underline = Some(false);
        self.smooth = Some(false);
        Ok(())
    }

    /// Underline, written only when it differs from the last value sent
    pub fn underline(&mut self, enabled: bool) -> PrintResult<()> {
        if self.underline == Some(enabled) {
            return Ok(());
        }
        // Unknown until the write succeeds
        self.underline = None;
        self.inner.underline(enabled)?;
        self.underline = Some(enabled);
        Ok(())
    }

    /// Smoothing, written only when it differs from the last value sent
    pub fn smooth(&mut self, enabled: bool) -> PrintResult<()> {
        if self.smooth == Some(enabled) {
            return Ok(());
        }
        self.smooth = None;
        self.inner.smooth(enabled)?;
        self.smooth = Some(enabled);
        Ok(())
    }

    /// Drop what is known about the printer, e.g. after raw writes
    pub fn forget(&mut self) {
        self.underline = None;
        self.smooth = None;
    }

    pub fn into_inner(self) -> Printer<T, C> {
        self.inner
    }
}

impl<T: Transport, C: CharacterConverter> Deref for TrackedPrinter<T, C> {
    type Target = Printer<T, C>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: Transport, C: CharacterConverter> DerefMut for TrackedPrinter<T, C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
