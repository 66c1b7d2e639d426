// Serial line configuration <-> packed UART config word
//
// The device stores its RS485 framing as the ESP32 Arduino `SERIAL_8xx` constant:
// independent bit groups for data bits, stop bits and parity, OR'd together.

use serde::{Deserialize, Serialize};

use crate::error::ConfigFormError;
use crate::models::Rs485Settings;

/// Data-bits group for 8 data bits. Always set on encode, ignored on decode.
pub const SERIAL_DATA_8: u16 = 0x400;
pub const SERIAL_STOP_BIT_1: u16 = 0x10;
pub const SERIAL_STOP_BIT_2: u16 = 0x30;
pub const SERIAL_PARITY_EVEN: u16 = 0x1;
pub const SERIAL_PARITY_ODD: u16 = 0x2;
pub const SERIAL_PARITY_NONE: u16 = 0x3;

const PARITY_MASK: u16 = 0x000F;
const STOP_BITS_MASK: u16 = 0x00F0;

/// Device defaults (`DEFAULT_MODBUS_BAUD`, 8N1, 200 ms).
pub const DEFAULT_BAUD_RATE: u32 = 9600;
pub const DEFAULT_RESPONSE_TIMEOUT_MS: u32 = 200;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    #[default]
    None,
    Even,
    Odd,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StopBits {
    #[default]
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
}

/// The 16-bit word consumed by the device's UART driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackedSerialWord(u16);

impl PackedSerialWord {
    pub const fn new(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    /// The device reports the word as a u32; only the low 16 bits carry framing.
    pub const fn from_device(raw: u32) -> Self {
        Self((raw & 0xFFFF) as u16)
    }
}

impl From<PackedSerialWord> for u32 {
    fn from(word: PackedSerialWord) -> Self {
        u32::from(word.0)
    }
}

/// The part of a line configuration that survives a decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineFraming {
    pub parity: Parity,
    pub stop_bits: StopBits,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerialLineConfig {
    pub baud_rate: u32,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub response_timeout_ms: u32,
}

impl Default for SerialLineConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            parity: Parity::None,
            stop_bits: StopBits::One,
            response_timeout_ms: DEFAULT_RESPONSE_TIMEOUT_MS,
        }
    }
}

impl SerialLineConfig {
    pub fn framing(&self) -> LineFraming {
        LineFraming {
            parity: self.parity,
            stop_bits: self.stop_bits,
        }
    }

    /// Builds the form model from the device's `rs485` settings block.
    pub fn from_rs485(settings: &Rs485Settings) -> Self {
        let framing = decode(PackedSerialWord::from_device(settings.serial_config));
        Self {
            baud_rate: settings.baud_rate,
            parity: framing.parity,
            stop_bits: framing.stop_bits,
            response_timeout_ms: u32::from(settings.response_timeout),
        }
    }

    /// Validates and packs the form model into the block the device accepts.
    pub fn to_rs485(&self) -> Result<Rs485Settings, ConfigFormError> {
        if self.baud_rate == 0 {
            return Err(ConfigFormError::ZeroBaudRate);
        }
        let response_timeout = u16::try_from(self.response_timeout_ms)
            .ok()
            .filter(|t| *t > 0)
            .ok_or(ConfigFormError::ResponseTimeout(self.response_timeout_ms))?;
        Ok(Rs485Settings {
            baud_rate: self.baud_rate,
            serial_config: encode(self).into(),
            response_timeout,
        })
    }
}

pub fn encode(config: &SerialLineConfig) -> PackedSerialWord {
    encode_framing(config.framing())
}

pub fn encode_framing(framing: LineFraming) -> PackedSerialWord {
    let stop_bits = match framing.stop_bits {
        StopBits::One => SERIAL_STOP_BIT_1,
        StopBits::Two => SERIAL_STOP_BIT_2,
    };
    let parity = match framing.parity {
        Parity::None => SERIAL_PARITY_NONE,
        Parity::Even => SERIAL_PARITY_EVEN,
        Parity::Odd => SERIAL_PARITY_ODD,
    };
    PackedSerialWord(SERIAL_DATA_8 | stop_bits | parity)
}

/// Recovers parity and stop bits from a packed word.
///
/// Unrecognized bit groups fall back to no parity and one stop bit; this never fails.
pub fn decode(word: PackedSerialWord) -> LineFraming {
    let parity = match word.0 & PARITY_MASK {
        SERIAL_PARITY_EVEN => Parity::Even,
        SERIAL_PARITY_ODD => Parity::Odd,
        _ => Parity::None,
    };
    let stop_bits = match word.0 & STOP_BITS_MASK {
        SERIAL_STOP_BIT_2 => StopBits::Two,
        _ => StopBits::One,
    };
    LineFraming { parity, stop_bits }
}
