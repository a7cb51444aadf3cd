//! Inertial measurement unit drivers.
//!
//! | Driver | Bus | Provides |
//! |--------|-----|----------|
//! | [`Bno055`] | I2C, 0x28 / 0x29 | raw accel, mag, gyro axes and die temperature |

pub mod bno055;
pub mod registers;

pub use bno055::Bno055;
