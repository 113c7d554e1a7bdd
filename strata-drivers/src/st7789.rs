//! ST7789 command executor
//!
//! Controller-side backend: applies window and data commands to an
//! ST7789-class TFT over SPI with separate data/command and chip-select
//! lines. Usable directly as a [`CommandChannel`] when the panel hangs off
//! the same MCU, or fed with decoded frames through [`St7789::execute`].
//!
//! Register initialisation is left to the board's bring-up code; this
//! driver assumes the panel is already awake in RGB565 mode.

use strata_core::{ChannelError, CommandChannel};
use strata_hal::{OutputPin, SpiBus, SpiConfig};
use strata_protocol::{DisplayCommand, Priority, Window};

/// ST7789 commands used for window addressing
pub mod cmd {
    /// Column address set
    pub const CASET: u8 = 0x2A;
    /// Row address set
    pub const RASET: u8 = 0x2B;
    /// Memory write
    pub const RAMWR: u8 = 0x2C;
}

/// ST7789 SPI executor
pub struct St7789<SPI, DC, CS> {
    spi: SPI,
    /// Data/command select: low = command, high = data
    dc: DC,
    /// Chip select, active low
    cs: CS,
    config: SpiConfig,
    /// Window opened by the last RAMWR
    window: Option<Window>,
    /// Pixel bytes written into `window` so far
    written: usize,
}

impl<SPI, DC, CS> St7789<SPI, DC, CS>
where
    SPI: SpiBus,
    DC: OutputPin,
    CS: OutputPin,
{
    /// Create a driver with the default 32 MHz mode-0 bus settings
    pub fn new(spi: SPI, dc: DC, cs: CS) -> Self {
        Self::with_config(spi, dc, cs, SpiConfig::default())
    }

    /// Create a driver with explicit bus settings
    pub fn with_config(spi: SPI, dc: DC, mut cs: CS, config: SpiConfig) -> Self {
        cs.set_high();
        Self {
            spi,
            dc,
            cs,
            config,
            window: None,
            written: 0,
        }
    }

    /// Bus settings the SPI peripheral should be configured with
    pub fn spi_config(&self) -> SpiConfig {
        self.config
    }

    /// Window currently open for pixel data
    pub fn window(&self) -> Option<Window> {
        self.window
    }

    /// Release the bus and pins
    pub fn release(self) -> (SPI, DC, CS) {
        (self.spi, self.dc, self.cs)
    }

    /// One chip-select framed transfer; CS is released even on error
    fn transmit(&mut self, is_data: bool, bytes: &[u8]) -> Result<(), SPI::Error> {
        self.dc.set_state(is_data);
        self.cs.set_low();
        let result = self.spi.write(bytes).and_then(|()| self.spi.flush());
        self.cs.set_high();
        result
    }

    /// Send a command byte followed by its parameters
    fn command(&mut self, command: u8, params: &[u8]) -> Result<(), SPI::Error> {
        self.transmit(false, &[command])?;
        if !params.is_empty() {
            self.transmit(true, params)?;
        }
        Ok(())
    }

    /// Program the column/row address window and open memory write
    pub fn set_address_window(&mut self, window: Window) -> Result<(), SPI::Error> {
        // Drop tracking first so a half-programmed window is never used
        self.window = None;
        self.written = 0;

        let [xs_hi, xs_lo] = window.x_start.to_be_bytes();
        let [xe_hi, xe_lo] = window.x_end.to_be_bytes();
        let [ys_hi, ys_lo] = window.y_start.to_be_bytes();
        let [ye_hi, ye_lo] = window.y_end.to_be_bytes();

        self.command(cmd::CASET, &[xs_hi, xs_lo, xe_hi, xe_lo])?;
        self.command(cmd::RASET, &[ys_hi, ys_lo, ye_hi, ye_lo])?;
        self.command(cmd::RAMWR, &[])?;

        self.window = Some(window);
        Ok(())
    }

    /// Stream pixel bytes into the open window
    pub fn write_pixels(&mut self, data: &[u8]) -> Result<(), ChannelError> {
        let window = self.window.ok_or(ChannelError::Unavailable)?;
        let written = self.written + data.len();
        if written > window.byte_len() {
            return Err(ChannelError::PayloadTooLarge);
        }
        if data.is_empty() {
            return Ok(());
        }

        if self.transmit(true, data).is_err() {
            // Controller's write pointer is unknown now
            self.window = None;
            return Err(ChannelError::Bus);
        }
        self.written = written;
        Ok(())
    }

    /// Apply a decoded protocol command
    pub fn execute(&mut self, command: &DisplayCommand<'_>) -> Result<(), ChannelError> {
        match command {
            DisplayCommand::SetWindow(window) => self
                .set_address_window(*window)
                .map_err(|_| ChannelError::Bus),
            DisplayCommand::WriteData(data) => self.write_pixels(data),
        }
    }
}

/// Direct drive: commands hit the bus immediately, so priority is ignored
impl<SPI, DC, CS> CommandChannel for St7789<SPI, DC, CS>
where
    SPI: SpiBus,
    DC: OutputPin,
    CS: OutputPin,
{
    fn set_window(&mut self, window: Window, _priority: Priority) -> Result<(), ChannelError> {
        self.set_address_window(window).map_err(|_| ChannelError::Bus)
    }

    fn write_data(&mut self, data: &[u8], _priority: Priority) -> Result<(), ChannelError> {
        self.write_pixels(data)
    }
}
