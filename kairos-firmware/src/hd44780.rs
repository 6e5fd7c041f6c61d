//! HD44780 character LCD behind a PCF8574 I2C backpack
//!
//! Minimal 4-bit-mode driver for the 20x4 panel, implementing the
//! `DisplayBackend` contract the LCD task drives.

use embassy_time::Delay;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use kairos_display::{DisplayBackend, DisplayError, SCREEN_COLS, SCREEN_ROWS};

/// Default address of the PCF8574 backpack
pub const LCD_I2C_ADDR: u8 = 0x27;

// PCF8574 bit mapping
const RS: u8 = 0x01;
const EN: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

// HD44780 commands
const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE: u8 = 0x06; // increment, no display shift
const CMD_DISPLAY_ON: u8 = 0x0C; // display on, cursor off
const CMD_CURSOR_ON: u8 = 0x0E; // display on, cursor visible
const CMD_FUNCTION_SET: u8 = 0x28; // 4-bit bus, two logical lines, 5x8 font
const CMD_SET_DDRAM: u8 = 0x80;

/// DDRAM start address per row on 20x4 panels
const ROW_OFFSETS: [u8; SCREEN_ROWS] = [0x00, 0x40, 0x14, 0x54];

pub struct Hd44780<I2C> {
    i2c: I2C,
    address: u8,
    backlight: bool,
    delay: Delay,
    initialized: bool,
}

impl<I2C: I2c> Hd44780<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            backlight: true,
            delay: Delay,
            initialized: false,
        }
    }

    /// Run the 4-bit init dance, switch the display on and clear it
    ///
    /// Ends with the same cosmetic sequence the appliance has always shown
    /// at boot: backlight off, on again, cursor visible.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.delay.delay_ms(50);

        // The controller wakes up in 8-bit mode; repeat the wake-up nibble
        // before dropping to 4-bit
        for _ in 0..3 {
            self.write_nibble(0x30, false)?;
            self.delay.delay_ms(5);
        }
        self.write_nibble(0x20, false)?;
        self.delay.delay_ms(1);

        self.command(CMD_FUNCTION_SET)?;
        self.command(CMD_DISPLAY_ON)?;
        self.command(CMD_ENTRY_MODE)?;
        self.initialized = true;
        self.clear()?;

        self.set_backlight(false)?;
        self.set_backlight(true)?;
        self.set_cursor_visible(true)?;
        Ok(())
    }

    fn bus_write(&mut self, byte: u8) -> Result<(), DisplayError> {
        let light = if self.backlight { BACKLIGHT } else { 0 };
        self.i2c
            .write(self.address, &[byte | light])
            .map_err(|_| DisplayError::Communication)
    }

    /// Clock one nibble (already in the high bits) through the enable line
    fn write_nibble(&mut self, nibble: u8, is_data: bool) -> Result<(), DisplayError> {
        let rs = if is_data { RS } else { 0 };
        self.bus_write(nibble | rs | EN)?;
        self.delay.delay_us(1);
        self.bus_write(nibble | rs)?;
        self.delay.delay_us(50);
        Ok(())
    }

    fn write_byte(&mut self, byte: u8, is_data: bool) -> Result<(), DisplayError> {
        self.write_nibble(byte & 0xF0, is_data)?;
        self.write_nibble(byte << 4, is_data)
    }

    fn command(&mut self, command: u8) -> Result<(), DisplayError> {
        self.write_byte(command, false)
    }

    fn data(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.write_byte(byte, true)
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
        if row as usize >= SCREEN_ROWS || col as usize >= SCREEN_COLS {
            return Err(DisplayError::InvalidCoordinates);
        }
        self.command(CMD_SET_DDRAM | (ROW_OFFSETS[row as usize] + col))
    }
}

impl<I2C: I2c> DisplayBackend for Hd44780<I2C> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        self.command(CMD_CLEAR)?;
        // Clear needs more time than ordinary commands
        self.delay.delay_ms(2);
        Ok(())
    }

    fn write_line(&mut self, text: &str, col: u8, row: u8) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        self.set_cursor(col, row)?;
        let visible = SCREEN_COLS - col as usize;
        for ch in text.chars().take(visible) {
            let byte = if ch.is_ascii() && !ch.is_ascii_control() {
                ch as u8
            } else {
                b'?'
            };
            self.data(byte)?;
        }
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> Result<(), DisplayError> {
        self.command(if visible { CMD_CURSOR_ON } else { CMD_DISPLAY_ON })
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), DisplayError> {
        self.backlight = on;
        // Dummy transfer so the new backlight bit reaches the expander
        self.bus_write(0)
    }
}
