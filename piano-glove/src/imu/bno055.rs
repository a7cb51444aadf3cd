//! Bosch BNO055 inertial measurement unit driver.
//!
//! Runs the chip in non-fusion AMG mode and exposes raw axis readings. The
//! octave tracker only needs gyro X and accel X, but every axis of every
//! sensor is readable.
//!
//! The driver is generic over any [`embedded_hal::i2c::I2c`] and
//! [`embedded_hal::delay::DelayNs`] implementation.
//!
//! ## Usage
//!
//! ```ignore
//! let mut imu = Bno055::new(i2c, delay);
//! imu.init()?;
//! let gyro_x = imu.read_axis(Sensor::Gyro, Axis::X)?;
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::registers as reg;
use crate::error::SensorError;
use crate::sensor::{Axis, InertialSensor, Sensor};

/// BNO055 driver in raw accelerometer/magnetometer/gyroscope mode.
pub struct Bno055<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C, D> Bno055<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    pub const DEFAULT_ADDRESS: u8 = reg::ADDRESS_A;
    pub const ALT_ADDRESS: u8 = reg::ADDRESS_B;

    /// Driver at the default address (0x28).
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::new_with_address(i2c, delay, Self::DEFAULT_ADDRESS)
    }

    pub fn new_with_address(i2c: I2C, delay: D, address: u8) -> Self {
        Bno055 {
            i2c,
            delay,
            address,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, &[register, value])
    }

    pub fn read_register(&mut self, register: u8) -> Result<u8, I2C::Error> {
        let mut buf = [0u8; 1];
        self.i2c.write_read(self.address, &[register], &mut buf)?;
        Ok(buf[0])
    }

    /// Two consecutive registers as a little-endian signed value.
    fn read_i16(&mut self, register: u8) -> Result<i16, I2C::Error> {
        let mut buf = [0u8; 2];
        self.i2c.write_read(self.address, &[register], &mut buf)?;
        Ok(i16::from_le_bytes(buf))
    }

    /// Verify the chip and configure it for raw AMG readings.
    ///
    /// Sensors end up at ±2 g (accel) and 250 dps (gyro). Fails with
    /// [`SensorError::UnexpectedChipId`] if something other than a BNO055
    /// answers.
    pub fn init(&mut self) -> Result<(), SensorError<I2C::Error>> {
        self.write_register(reg::PAGE_ID, reg::PAGE0)?;
        let found = self.read_register(reg::CHIP_ID)?;
        if found != reg::BNO055_ID {
            return Err(SensorError::UnexpectedChipId { found });
        }

        self.write_register(reg::OPR_MODE, reg::MODE_CONFIG)?;
        self.delay.delay_ms(reg::CONFIG_SWITCH_MS);

        self.write_register(reg::PAGE_ID, reg::PAGE1)?;
        self.write_register(reg::ACC_CONFIG, reg::ACC_CONFIG_PARAMS)?;
        self.write_register(reg::GYR_CONFIG_0, reg::GYR_CONFIG_PARAMS)?;
        self.write_register(reg::PAGE_ID, reg::PAGE0)?;

        self.write_register(reg::UNIT_SEL, reg::UNITS_PARAMS)?;
        self.write_register(reg::OPR_MODE, reg::MODE_AMG)?;
        self.delay.delay_ms(reg::OPERATING_SWITCH_MS);

        #[cfg(feature = "tracing")]
        tracing::debug!(address = self.address, "bno055 ready");

        Ok(())
    }

    /// Raw reading of one axis.
    pub fn read_axis(&mut self, sensor: Sensor, axis: Axis) -> Result<i16, SensorError<I2C::Error>> {
        let base = match sensor {
            Sensor::Accel => reg::ACC_DATA_X_LSB,
            Sensor::Mag => reg::MAG_DATA_X_LSB,
            Sensor::Gyro => reg::GYR_DATA_X_LSB,
        };
        let offset = match axis {
            Axis::X => 0,
            Axis::Y => 2,
            Axis::Z => 4,
        };
        Ok(self.read_i16(base + offset)?)
    }

    /// Die temperature in °C.
    pub fn read_temperature(&mut self) -> Result<i8, SensorError<I2C::Error>> {
        Ok(self.read_register(reg::TEMP)? as i8)
    }

    /// Release the bus and delay provider.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

impl<I2C, D> InertialSensor for Bno055<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    type Error = SensorError<I2C::Error>;

    fn read_axis(&mut self, sensor: Sensor, axis: Axis) -> Result<i16, Self::Error> {
        Bno055::read_axis(self, sensor, axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{self, ErrorType, Operation};

    #[derive(Debug, PartialEq)]
    struct MockError;

    impl i2c::Error for MockError {
        fn kind(&self) -> i2c::ErrorKind {
            i2c::ErrorKind::NoAcknowledge(i2c::NoAcknowledgeSource::Address)
        }
    }

    /// Paged register file with a write log.
    struct MockI2c {
        pages: [[u8; 128]; 2],
        page: usize,
        log: [(usize, u8, u8); 32],
        log_count: usize,
        last_address: u8,
        fail: bool,
    }

    impl MockI2c {
        fn new() -> Self {
            let mut m = MockI2c {
                pages: [[0; 128]; 2],
                page: 0,
                log: [(0, 0, 0); 32],
                log_count: 0,
                last_address: 0,
                fail: false,
            };
            m.pages[0][reg::CHIP_ID as usize] = reg::BNO055_ID;
            m
        }

        fn set_i16(&mut self, register: u8, value: i16) {
            let [lo, hi] = value.to_le_bytes();
            self.pages[0][register as usize] = lo;
            self.pages[0][register as usize + 1] = hi;
        }

        /// (page, register, value) of the nth write.
        fn write_at(&self, idx: usize) -> (usize, u8, u8) {
            self.log[idx]
        }
    }

    impl ErrorType for MockI2c {
        type Error = MockError;
    }

    impl I2c for MockI2c {
        fn read(&mut self, _addr: u8, _buf: &mut [u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<(), Self::Error> {
            if self.fail {
                return Err(MockError);
            }
            self.last_address = addr;
            if let [register, value] = *bytes {
                self.log[self.log_count] = (self.page, register, value);
                self.log_count += 1;
                if register == reg::PAGE_ID {
                    self.page = value as usize;
                } else {
                    self.pages[self.page][register as usize] = value;
                }
            }
            Ok(())
        }

        fn write_read(&mut self, addr: u8, wr: &[u8], rd: &mut [u8]) -> Result<(), Self::Error> {
            if self.fail {
                return Err(MockError);
            }
            self.last_address = addr;
            let start = wr[0] as usize;
            for (i, b) in rd.iter_mut().enumerate() {
                *b = self.pages[self.page][start + i];
            }
            Ok(())
        }

        fn transaction(
            &mut self,
            _addr: u8,
            _ops: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    struct MockDelay {
        total_ms: u32,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ms += ns / 1_000_000;
        }

        fn delay_ms(&mut self, ms: u32) {
            self.total_ms += ms;
        }
    }

    fn make_imu() -> Bno055<MockI2c, MockDelay> {
        Bno055::new(MockI2c::new(), MockDelay { total_ms: 0 })
    }

    #[test]
    fn init_writes_configuration_sequence() {
        let mut imu = make_imu();
        imu.init().unwrap();
        let (i2c, delay) = imu.release();

        assert_eq!(i2c.log_count, 8);
        assert_eq!(i2c.write_at(0), (0, reg::PAGE_ID, reg::PAGE0));
        assert_eq!(i2c.write_at(1), (0, reg::OPR_MODE, reg::MODE_CONFIG));
        assert_eq!(i2c.write_at(2), (0, reg::PAGE_ID, reg::PAGE1));
        assert_eq!(i2c.write_at(3), (1, reg::ACC_CONFIG, 0x18));
        assert_eq!(i2c.write_at(4), (1, reg::GYR_CONFIG_0, 0x33));
        assert_eq!(i2c.write_at(5), (1, reg::PAGE_ID, reg::PAGE0));
        assert_eq!(i2c.write_at(6), (0, reg::UNIT_SEL, 0x01));
        assert_eq!(i2c.write_at(7), (0, reg::OPR_MODE, reg::MODE_AMG));

        assert_eq!(i2c.page, 0);
        assert_eq!(i2c.last_address, 0x28);
        assert!(delay.total_ms >= reg::CONFIG_SWITCH_MS + reg::OPERATING_SWITCH_MS);
    }

    #[test]
    fn init_rejects_wrong_chip() {
        let mut i2c = MockI2c::new();
        i2c.pages[0][reg::CHIP_ID as usize] = 0x33;
        let mut imu = Bno055::new(i2c, MockDelay { total_ms: 0 });

        assert_eq!(
            imu.init(),
            Err(SensorError::UnexpectedChipId { found: 0x33 })
        );
        let (i2c, _) = imu.release();
        // Nothing configured past the page select
        assert_eq!(i2c.log_count, 1);
    }

    #[test]
    fn init_propagates_bus_errors() {
        let mut i2c = MockI2c::new();
        i2c.fail = true;
        let mut imu = Bno055::new(i2c, MockDelay { total_ms: 0 });
        assert_eq!(imu.init(), Err(SensorError::Bus(MockError)));
    }

    #[test]
    fn alternate_address() {
        let mut imu = Bno055::new_with_address(
            MockI2c::new(),
            MockDelay { total_ms: 0 },
            Bno055::<MockI2c, MockDelay>::ALT_ADDRESS,
        );
        imu.init().unwrap();
        assert_eq!(imu.address(), 0x29);
        let (i2c, _) = imu.release();
        assert_eq!(i2c.last_address, 0x29);
    }

    #[test]
    fn reads_little_endian_axes() {
        let mut i2c = MockI2c::new();
        i2c.set_i16(reg::GYR_DATA_X_LSB, -1234);
        i2c.set_i16(reg::ACC_DATA_X_LSB, 850);
        i2c.set_i16(reg::ACC_DATA_X_LSB + 4, -16);
        i2c.set_i16(reg::MAG_DATA_X_LSB + 2, 300);
        let mut imu = Bno055::new(i2c, MockDelay { total_ms: 0 });
        imu.init().unwrap();

        assert_eq!(imu.read_axis(Sensor::Gyro, Axis::X), Ok(-1234));
        assert_eq!(imu.read_axis(Sensor::Accel, Axis::X), Ok(850));
        assert_eq!(imu.read_axis(Sensor::Accel, Axis::Z), Ok(-16));
        assert_eq!(imu.read_axis(Sensor::Mag, Axis::Y), Ok(300));
        assert_eq!(imu.read_axis(Sensor::Gyro, Axis::Y), Ok(0));
    }

    #[test]
    fn temperature_is_signed() {
        let mut i2c = MockI2c::new();
        i2c.pages[0][reg::TEMP as usize] = 0xFB;
        let mut imu = Bno055::new(i2c, MockDelay { total_ms: 0 });
        assert_eq!(imu.read_temperature(), Ok(-5));
    }

    #[test]
    fn usable_through_trait() {
        fn gyro_x<S: InertialSensor>(s: &mut S) -> Result<i16, S::Error> {
            s.read_axis(Sensor::Gyro, Axis::X)
        }

        let mut i2c = MockI2c::new();
        i2c.set_i16(reg::GYR_DATA_X_LSB, 42);
        let mut imu = Bno055::new(i2c, MockDelay { total_ms: 0 });
        assert_eq!(gyro_x(&mut imu), Ok(42));
    }
}
