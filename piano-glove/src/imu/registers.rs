//! BNO055 register map (the subset this driver touches).
//!
//! Addresses are 8-bit and paged: most live on page 0, sensor configuration
//! on page 1. Multi-byte readings are little-endian, LSB first.

// ── I2C addresses ──────────────────────────────────────────────────────────

/// COM3/ADR pin tied to ground.
pub const ADDRESS_A: u8 = 0x28;

/// COM3/ADR pin tied to 3.3 V.
pub const ADDRESS_B: u8 = 0x29;

/// Expected contents of [`CHIP_ID`].
pub const BNO055_ID: u8 = 0xA0;

// ── Page 0 ─────────────────────────────────────────────────────────────────

pub const CHIP_ID: u8 = 0x00;

/// Register page selector, present on both pages.
pub const PAGE_ID: u8 = 0x07;

pub const ACC_DATA_X_LSB: u8 = 0x08;
pub const MAG_DATA_X_LSB: u8 = 0x0E;
pub const GYR_DATA_X_LSB: u8 = 0x14;

pub const TEMP: u8 = 0x34;

/// Unit selection.
/// - Bit 4 — temperature (0 = °C)
/// - Bit 1 — gyro (0 = dps)
/// - Bit 0 — accel (0 = m/s², 1 = mg)
pub const UNIT_SEL: u8 = 0x3B;

/// Operating mode, bits 3:0.
pub const OPR_MODE: u8 = 0x3D;

// ── Page 1 ─────────────────────────────────────────────────────────────────

/// Accelerometer config.
/// - Bits 7:5 — power mode
/// - Bits 4:2 — bandwidth
/// - Bits 1:0 — range
pub const ACC_CONFIG: u8 = 0x08;

/// Gyroscope config 0.
/// - Bits 5:3 — bandwidth
/// - Bits 2:0 — range
pub const GYR_CONFIG_0: u8 = 0x0A;

// ── Values ─────────────────────────────────────────────────────────────────

pub const PAGE0: u8 = 0;
pub const PAGE1: u8 = 1;

/// Normal power, 500 Hz bandwidth, ±2 g.
pub const ACC_CONFIG_PARAMS: u8 = 0x18;

/// 64 Hz bandwidth, 250 dps.
pub const GYR_CONFIG_PARAMS: u8 = 0x33;

/// Accel in mg, gyro in dps, temperature in °C.
pub const UNITS_PARAMS: u8 = 0x01;

pub const MODE_CONFIG: u8 = 0x00;

/// Non-fusion accel + mag + gyro.
pub const MODE_AMG: u8 = 0x07;

// ── Timing (datasheet table 3-6) ───────────────────────────────────────────

/// Any mode to CONFIG.
pub const CONFIG_SWITCH_MS: u32 = 19;

/// CONFIG to any operating mode.
pub const OPERATING_SWITCH_MS: u32 = 7;
