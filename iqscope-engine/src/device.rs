use std::fmt;
use std::time::Duration;

use iqscope_messages::{Backend, Hertz, TuningState};
use log::{debug, info, warn};

use crate::config::AnalyzerConfig;
use crate::driver::{self, DriverStatus, RadioDriver};
use crate::error::{Error, Parameter, Result};

/// Owns the radio connection and the cache of confirmed tuning.
///
/// The cached [`TuningState`] only changes after the driver accepts a value,
/// so the getters never need to query hardware. Dropping the handle disables
/// RX and closes the device.
pub struct DeviceHandle {
    driver: Option<Box<dyn RadioDriver>>,
    tuning: TuningState,
}

impl DeviceHandle {
    /// Open the first radio available for `backend` and bring it up.
    pub fn initialize(backend: &Backend, config: &AnalyzerConfig) -> Result<Self> {
        let driver = driver::open(backend).map_err(|status| Error::DeviceUnavailable { status })?;
        Self::with_driver(driver, config)
    }

    /// Bring up an already opened driver: tune, configure streaming, enable RX.
    ///
    /// Any refusal drops the driver before returning, which closes it.
    pub fn with_driver(mut driver: Box<dyn RadioDriver>, config: &AnalyzerConfig) -> Result<Self> {
        let tuning = config.tuning;

        driver
            .set_frequency(tuning.center_frequency)
            .map_err(rejected(Parameter::Frequency))?;
        driver
            .set_sample_rate(tuning.sample_rate)
            .map_err(rejected(Parameter::SampleRate))?;
        driver
            .set_bandwidth(tuning.bandwidth)
            .map_err(rejected(Parameter::Bandwidth))?;
        driver
            .set_gain(tuning.gain)
            .map_err(rejected(Parameter::Gain))?;
        driver
            .configure_stream(&config.stream)
            .map_err(rejected(Parameter::Stream))?;
        driver
            .set_rx_enabled(true)
            .map_err(rejected(Parameter::RxEnable))?;

        info!(
            "Radio ready: {} center, {} rate, {} bandwidth, {} dB gain",
            Hertz(tuning.center_frequency),
            Hertz::from(tuning.sample_rate),
            Hertz::from(tuning.bandwidth),
            tuning.gain
        );

        Ok(Self {
            driver: Some(driver),
            tuning,
        })
    }

    pub fn set_frequency(&mut self, hz: u64) -> Result<()> {
        self.apply(Parameter::Frequency, |d| d.set_frequency(hz))?;
        self.tuning.center_frequency = hz;
        info!("Frequency set to {}", Hertz(hz));
        Ok(())
    }

    pub fn set_sample_rate(&mut self, hz: u32) -> Result<()> {
        self.apply(Parameter::SampleRate, |d| d.set_sample_rate(hz))?;
        self.tuning.sample_rate = hz;
        info!("Sample rate set to {}", Hertz::from(hz));
        Ok(())
    }

    pub fn set_bandwidth(&mut self, hz: u32) -> Result<()> {
        self.apply(Parameter::Bandwidth, |d| d.set_bandwidth(hz))?;
        self.tuning.bandwidth = hz;
        info!("Bandwidth set to {}", Hertz::from(hz));
        Ok(())
    }

    pub fn set_gain(&mut self, db: i32) -> Result<()> {
        self.apply(Parameter::Gain, |d| d.set_gain(db))?;
        self.tuning.gain = db;
        info!("Gain set to {} dB", db);
        Ok(())
    }

    pub fn frequency(&self) -> u64 {
        self.tuning.center_frequency
    }

    pub fn sample_rate(&self) -> u32 {
        self.tuning.sample_rate
    }

    pub fn bandwidth(&self) -> u32 {
        self.tuning.bandwidth
    }

    pub fn gain(&self) -> i32 {
        self.tuning.gain
    }

    pub fn tuning(&self) -> TuningState {
        self.tuning
    }

    pub fn is_open(&self) -> bool {
        self.driver.is_some()
    }

    /// Disable RX and release the device. Calling it again is a no-op.
    pub fn shutdown(&mut self) {
        let Some(mut driver) = self.driver.take() else {
            return;
        };
        if let Err(status) = driver.set_rx_enabled(false) {
            warn!("Failed to disable RX during shutdown: {}", status);
        }
        drop(driver);
        info!("Radio closed");
    }

    pub(crate) fn read(&mut self, samples: &mut [i16], timeout: Duration) -> std::result::Result<(), DriverStatus> {
        match self.driver.as_deref_mut() {
            Some(driver) => driver.read(samples, timeout),
            None => Err(DriverStatus::NO_DEVICE),
        }
    }

    fn apply<F>(&mut self, parameter: Parameter, f: F) -> Result<()>
    where
        F: FnOnce(&mut dyn RadioDriver) -> std::result::Result<(), DriverStatus>,
    {
        let driver = self
            .driver
            .as_deref_mut()
            .ok_or(Error::ConfigurationRejected {
                parameter,
                status: DriverStatus::NO_DEVICE,
            })?;
        debug!("Applying {}", parameter);
        f(driver).map_err(|status| {
            warn!("Hardware rejected {}: {}", parameter, status);
            Error::ConfigurationRejected { parameter, status }
        })
    }
}

impl fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("open", &self.is_open())
            .field("tuning", &self.tuning)
            .finish()
    }
}

impl Drop for DeviceHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn rejected(parameter: Parameter) -> impl Fn(DriverStatus) -> Error {
    move |status| {
        warn!("Initialization failed, {} rejected: {}", parameter, status);
        Error::ConfigurationRejected { parameter, status }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_tone() -> DeviceHandle {
        DeviceHandle::initialize(&Backend::default(), &AnalyzerConfig::default()).unwrap()
    }

    #[test]
    fn test_initialize_applies_default_tuning() {
        let device = open_tone();
        assert!(device.is_open());
        assert_eq!(device.tuning(), TuningState::default());
    }

    #[test]
    fn test_rejected_setter_keeps_previous_value() {
        let mut device = open_tone();
        let before = device.tuning();

        let err = device.set_gain(1000).unwrap_err();
        assert_eq!(
            err,
            Error::ConfigurationRejected {
                parameter: Parameter::Gain,
                status: DriverStatus::RANGE,
            }
        );
        assert_eq!(device.tuning(), before);
    }

    #[test]
    fn test_accepted_setters_update_cache() {
        let mut device = open_tone();
        device.set_frequency(2_400_000_000).unwrap();
        device.set_sample_rate(20_000_000).unwrap();
        device.set_bandwidth(18_000_000).unwrap();
        device.set_gain(12).unwrap();

        assert_eq!(device.frequency(), 2_400_000_000);
        assert_eq!(device.sample_rate(), 20_000_000);
        assert_eq!(device.bandwidth(), 18_000_000);
        assert_eq!(device.gain(), 12);
    }

    #[test]
    fn test_initialize_rejects_bad_default() {
        let config = AnalyzerConfig {
            tuning: TuningState {
                center_frequency: 1_000,
                ..TuningState::default()
            },
            ..AnalyzerConfig::default()
        };
        let result = DeviceHandle::initialize(&Backend::default(), &config);
        assert!(matches!(
            result,
            Err(Error::ConfigurationRejected {
                parameter: Parameter::Frequency,
                ..
            })
        ));
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut device = open_tone();
        device.shutdown();
        device.shutdown();
        assert!(!device.is_open());

        // Cache survives, hardware calls do not
        assert_eq!(device.frequency(), 915_000_000);
        assert_eq!(
            device.set_frequency(100_000_000),
            Err(Error::ConfigurationRejected {
                parameter: Parameter::Frequency,
                status: DriverStatus::NO_DEVICE,
            })
        );
        let mut buf = [0i16; 4];
        assert_eq!(
            device.read(&mut buf, Duration::from_millis(10)),
            Err(DriverStatus::NO_DEVICE)
        );
    }
}
