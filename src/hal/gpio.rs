//! GPIO HAL for indicator LEDs and scope probe pins.

use esp_idf_svc::hal::gpio::{AnyOutputPin, Output, PinDriver};

use super::HalError;
use crate::board::{LedChannel, Leds};
use crate::timer::SampleHandler;

/// The two indicator LEDs (active high).
pub struct LedPins {
    a: PinDriver<'static, AnyOutputPin, Output>,
    b: PinDriver<'static, AnyOutputPin, Output>,
}

impl LedPins {
    /// Configure both pins as outputs, LEDs off.
    pub fn new(a: AnyOutputPin, b: AnyOutputPin) -> Result<Self, HalError> {
        let mut a = PinDriver::output(a).map_err(HalError::Gpio)?;
        let mut b = PinDriver::output(b).map_err(HalError::Gpio)?;
        a.set_low().map_err(HalError::Gpio)?;
        b.set_low().map_err(HalError::Gpio)?;
        Ok(Self { a, b })
    }

    fn pin(&mut self, channel: LedChannel) -> &mut PinDriver<'static, AnyOutputPin, Output> {
        match channel {
            LedChannel::A => &mut self.a,
            LedChannel::B => &mut self.b,
        }
    }
}

impl Leds for LedPins {
    fn set_led(&mut self, channel: LedChannel, on: bool) {
        let pin = self.pin(channel);
        let _ = if on { pin.set_high() } else { pin.set_low() };
    }

    fn toggle_led(&mut self, channel: LedChannel) {
        let _ = self.pin(channel).toggle();
    }
}

/// Debug pin held high while a task runs, for timing on a scope.
pub struct DebugPin {
    pin: PinDriver<'static, AnyOutputPin, Output>,
}

impl DebugPin {
    pub fn new(pin: AnyOutputPin) -> Result<Self, HalError> {
        let mut pin = PinDriver::output(pin).map_err(HalError::Gpio)?;
        pin.set_low().map_err(HalError::Gpio)?;
        Ok(Self { pin })
    }

    #[inline]
    pub fn set(&mut self, high: bool) {
        let _ = if high { self.pin.set_high() } else { self.pin.set_low() };
    }

    /// Run `f` with the pin high.
    #[inline]
    pub fn measure<R>(&mut self, f: impl FnOnce() -> R) -> R {
        let _ = self.pin.set_high();
        let r = f();
        let _ = self.pin.set_low();
        r
    }
}

/// Sample handler wrapped with a debug pin.
pub struct Probed<H: SampleHandler> {
    probe: DebugPin,
    inner: H,
}

impl<H: SampleHandler> Probed<H> {
    pub fn new(probe: DebugPin, inner: H) -> Self {
        Self { probe, inner }
    }
}

impl<H: SampleHandler> SampleHandler for Probed<H> {
    #[inline]
    fn on_tick(&mut self) {
        let inner = &mut self.inner;
        self.probe.measure(|| inner.on_tick());
    }
}
