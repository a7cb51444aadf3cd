//! Collaborator traits for the glove's inputs.
//!
//! The pipeline reads hardware only through these traits, so board support
//! code decides which ADC, IMU and timer back them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Multichannel ADC returning 12-bit readings.
pub trait AnalogSampler {
    type Error: core::fmt::Debug;

    /// Read `channel`, yielding a value in `0..=ADC_MAX`.
    fn read_channel(&mut self, channel: u8) -> Result<u16, Self::Error>;
}

/// Sensor block inside an inertial measurement unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Sensor {
    Accel,
    Mag,
    Gyro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Raw signed axis readings from an IMU.
pub trait InertialSensor {
    type Error: core::fmt::Debug;

    fn read_axis(&mut self, sensor: Sensor, axis: Axis) -> Result<i16, Self::Error>;
}

/// Millisecond time source. Wraps at `u32::MAX`; consumers compare with
/// wrapping subtraction.
pub trait Clock {
    fn now_millis(&mut self) -> u32;
}

impl<T: AnalogSampler + ?Sized> AnalogSampler for &mut T {
    type Error = T::Error;

    fn read_channel(&mut self, channel: u8) -> Result<u16, Self::Error> {
        (**self).read_channel(channel)
    }
}

impl<T: InertialSensor + ?Sized> InertialSensor for &mut T {
    type Error = T::Error;

    fn read_axis(&mut self, sensor: Sensor, axis: Axis) -> Result<i16, Self::Error> {
        (**self).read_axis(sensor, axis)
    }
}
