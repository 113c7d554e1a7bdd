//! SPI bus abstraction
//!
//! Display traffic is write-only: register bytes and pixel bursts are
//! clocked out, nothing is read back.

/// Write-only SPI master
pub trait SpiBus {
    /// Error type for SPI operations
    type Error;

    /// Clock out `data`
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Block until every queued byte has left the shift register
    ///
    /// Called before chip select is released. Buses without a TX FIFO
    /// can rely on the default no-op.
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<T: SpiBus + ?Sized> SpiBus for &mut T {
    type Error = T::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }
}

/// SPI mode (combined clock polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// CPOL=0, CPHA=0
    #[default]
    Mode0,
    /// CPOL=0, CPHA=1
    Mode1,
    /// CPOL=1, CPHA=0
    Mode2,
    /// CPOL=1, CPHA=1
    Mode3,
}

impl Mode {
    /// Clock idles high
    pub const fn idle_high(self) -> bool {
        matches!(self, Mode::Mode2 | Mode::Mode3)
    }

    /// Data is captured on the second clock edge
    pub const fn capture_on_second_edge(self) -> bool {
        matches!(self, Mode::Mode1 | Mode::Mode3)
    }
}

/// SPI configuration requested by a display backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Clock mode
    pub mode: Mode,
}

impl SpiConfig {
    /// Lowest clock the display backends accept
    pub const MIN_FREQUENCY: u32 = 1_000_000;

    /// Create a config at `frequency` Hz, clamped to [`Self::MIN_FREQUENCY`]
    pub const fn new(frequency: u32, mode: Mode) -> Self {
        let frequency = if frequency < Self::MIN_FREQUENCY {
            Self::MIN_FREQUENCY
        } else {
            frequency
        };
        Self { frequency, mode }
    }
}

impl Default for SpiConfig {
    fn default() -> Self {
        // ST7789-class panels run mode 0 at 32 MHz
        Self::new(32_000_000, Mode::Mode0)
    }
}
