use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};

use crate::error::DhtError;
use crate::interrupt::{InterruptController, InterruptGuard, NoInterrupts};
use crate::measurement::{Measurement, Scale};
use crate::payload::{BitPacker, FRAME_BITS, Payload};
use crate::retry::Retry;
use crate::timing::{
    self, ACK_MAX_HIGH_US, BIT_MAX_HIGH_US, MicroClock, REQUEST_HIGH_US, REQUEST_LOW_MS,
    RETRY_DELAY_MS, STUCK_LINE_US,
};

/// Driver for the DHT11 temperature and humidity sensor.
///
/// Every read runs a full transaction with the sensor. Nothing is cached, so
/// callers must keep reads at least one sampling interval of the sensor apart.
pub struct Dht11<PIN, DELAY, CLOCK, IRQ = NoInterrupts> {
    line: DataLine<PIN, DELAY, CLOCK>,
    interrupts: IRQ,
    retry: Retry,
}

impl<PIN, DELAY, CLOCK, IRQ, E> Dht11<PIN, DELAY, CLOCK, IRQ>
where
    PIN: InputPin<Error = E> + OutputPin<Error = E>,
    DELAY: DelayNs,
    CLOCK: MicroClock,
    IRQ: InterruptController,
{
    /// Creates a new instance of the DHT11 driver.
    ///
    /// # Arguments
    ///
    /// * `pin` - The open-drain GPIO pin connected to the data line. Driving it
    ///   high releases the line so it can be read.
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    /// * `clock` - A monotonic microsecond counter used to time the pulses.
    /// * `interrupts` - Masks the interrupts that would disturb the timing.
    ///   Use [`NoInterrupts`] if nothing needs masking.
    pub fn new(pin: PIN, delay: DELAY, clock: CLOCK, interrupts: IRQ) -> Self {
        Dht11 {
            line: DataLine { pin, delay, clock },
            interrupts,
            retry: Retry::Forever,
        }
    }

    /// Replaces the retry policy. The default retries forever.
    pub fn with_retry(mut self, retry: Retry) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry(&self) -> Retry {
        self.retry
    }

    /// Gives back the hardware resources.
    pub fn release(self) -> (PIN, DELAY, CLOCK, IRQ) {
        let DataLine { pin, delay, clock } = self.line;
        (pin, delay, clock, self.interrupts)
    }

    /// Reads the temperature in `scale`.
    pub fn read_temperature(&mut self, scale: Scale) -> Result<f32, DhtError<E>> {
        Ok(self.read_raw()?.temperature(scale))
    }

    /// Reads the relative humidity in percent.
    pub fn read_humidity(&mut self) -> Result<f32, DhtError<E>> {
        Ok(self.read_raw()?.humidity())
    }

    /// Reads temperature and humidity from the same transaction.
    pub fn read_measurement(&mut self, scale: Scale) -> Result<Measurement, DhtError<E>> {
        Ok(self.read_raw()?.measurement(scale))
    }

    /// Runs transactions until one delivers a frame with a valid checksum.
    ///
    /// Protocol faults are retried according to the [`Retry`] policy. With
    /// the default [`Retry::Forever`] the only possible error is a pin error,
    /// and the call blocks for as long as the sensor does not answer.
    ///
    /// # Returns
    ///
    /// * `Ok(Payload)` once a transaction succeeds.
    /// * `Err(DhtError::PinError)` as soon as the pin reports an error.
    /// * `Err(DhtError::TransactionFailed)` when the retry policy gives up.
    pub fn read_raw(&mut self) -> Result<Payload, DhtError<E>> {
        let started = self.line.clock.now_us();
        let mut attempts: u32 = 0;

        loop {
            attempts = attempts.saturating_add(1);

            // Interrupts are enabled during the pause between attempts
            self.line.delay.delay_ms(RETRY_DELAY_MS);

            let outcome = {
                let _guard = InterruptGuard::new(&mut self.interrupts);
                self.line.attempt()
            };

            match outcome {
                Ok(payload) => {
                    debug!("transaction complete after {} attempts", attempts);
                    return Ok(payload);
                }
                Err(err) if err.is_transient() => {
                    warn!("{} fault on attempt {}", err.kind(), attempts);
                    let elapsed = self.line.clock.elapsed_since(started);
                    if !self.retry.allows_another(attempts, elapsed) {
                        warn!("giving up after {} attempts", attempts);
                        return Err(DhtError::TransactionFailed { attempts });
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// The single data line and the timing primitives used to drive it.
struct DataLine<PIN, DELAY, CLOCK> {
    pin: PIN,
    delay: DELAY,
    clock: CLOCK,
}

impl<PIN, DELAY, CLOCK, E> DataLine<PIN, DELAY, CLOCK>
where
    PIN: InputPin<Error = E> + OutputPin<Error = E>,
    DELAY: DelayNs,
    CLOCK: MicroClock,
{
    /// One request, acknowledge, receive and checksum cycle.
    ///
    /// The line is left released on every exit path.
    fn attempt(&mut self) -> Result<Payload, DhtError<E>> {
        let result = self.exchange();
        if result.is_err() {
            // Report the first error, not one from releasing the line
            let _ = self.pin.set_high();
        }
        result
    }

    fn exchange(&mut self) -> Result<Payload, DhtError<E>> {
        self.request()?;
        self.confirm()?;
        self.receive()
    }

    /// Sends the start signal.
    ///
    /// The line is pulled low for 20 ms, then released and held high for
    /// 40 us before the sensor takes over.
    fn request(&mut self) -> Result<(), DhtError<E>> {
        self.pin.set_low()?;
        self.delay.delay_ms(REQUEST_LOW_MS);
        self.pin.set_high()?;
        self.delay.delay_us(REQUEST_HIGH_US);
        Ok(())
    }

    /// Checks the sensor's low-then-high acknowledgment.
    fn confirm(&mut self) -> Result<(), DhtError<E>> {
        let low = self.hold_time(false, STUCK_LINE_US, DhtError::Timeout)?;
        timing::check_ack_low(low).map_err(|_| {
            trace!("ack rejected: low phase {} us", low);
            DhtError::Acknowledge
        })?;

        let high = self.hold_time(true, ACK_MAX_HIGH_US, DhtError::Acknowledge)?;
        timing::check_ack_high(high).map_err(|_| {
            trace!("ack rejected: high phase {} us", high);
            DhtError::Acknowledge
        })?;

        Ok(())
    }

    /// Reads the 40 data bits and validates the checksum.
    fn receive(&mut self) -> Result<Payload, DhtError<E>> {
        let mut packer = BitPacker::new();
        for _ in 0..FRAME_BITS {
            packer.push(self.read_bit()?);
        }
        debug_assert!(packer.is_full());

        let payload = packer.finish();
        if payload.is_valid() {
            Ok(payload)
        } else {
            trace!(
                "checksum mismatch: computed {}, received {}",
                payload.checksum(),
                payload.received_checksum()
            );
            Err(DhtError::ChecksumMismatch {
                expected: payload.checksum(),
                actual: payload.received_checksum(),
            })
        }
    }

    /// Reads a single bit.
    ///
    /// Each bit is a low separator followed by a high phase whose length
    /// carries the value: about 26 us for `0`, about 70 us for `1`.
    fn read_bit(&mut self) -> Result<bool, DhtError<E>> {
        self.hold_time(false, STUCK_LINE_US, DhtError::Timeout)?;
        let high = self.hold_time(true, BIT_MAX_HIGH_US, DhtError::BitTiming)?;
        timing::decode_bit(high).ok_or(DhtError::BitTiming)
    }

    /// Measures how long the line stays at the given level, starting now.
    ///
    /// Returns the elapsed microseconds when the level changes, or `overrun`
    /// once more than `limit` microseconds have passed without a change.
    fn hold_time(
        &mut self,
        high: bool,
        limit: u32,
        overrun: DhtError<E>,
    ) -> Result<u32, DhtError<E>> {
        let start = self.clock.now_us();
        loop {
            let level = self.pin.is_high()?;
            let elapsed = self.clock.elapsed_since(start);
            if level != high {
                return Ok(elapsed);
            }
            if elapsed > limit {
                return Err(overrun);
            }
        }
    }
}
