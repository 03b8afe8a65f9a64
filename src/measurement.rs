use core::fmt;
use core::num::NonZeroU32;

/// Temperature scale a [`Measurement`] is expressed in.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Scale {
    /// Degrees Celsius.
    #[default]
    Celsius,
    /// Degrees Fahrenheit.
    Fahrenheit,
    /// Kelvin, with a 273 offset from Celsius.
    Kelvin,
}

impl Scale {
    /// Expresses a Celsius value in this scale.
    pub fn express(self, celsius: f32) -> f32 {
        match self {
            Scale::Celsius => celsius,
            Scale::Fahrenheit => celsius * 1.8 + 32.0,
            // Integer offset, not 273.15.
            Scale::Kelvin => celsius + 273.0,
        }
    }

    /// Converts a value in this scale into Celsius.
    pub fn to_celsius(self, value: f32) -> f32 {
        match self {
            Scale::Celsius => value,
            Scale::Fahrenheit => (value - 32.0) / 1.8,
            Scale::Kelvin => value - 273.0,
        }
    }

    /// Unit suffix used when formatting.
    pub const fn suffix(self) -> &'static str {
        match self {
            Scale::Celsius => "C",
            Scale::Fahrenheit => "F",
            Scale::Kelvin => "K",
        }
    }
}

/// A temperature and humidity reading.
///
/// The temperature is tagged with the [`Scale`] it is expressed in, humidity is
/// always relative humidity in percent. The weight counts how many readings
/// were folded into this one by [`Measurement::combine`] and is only used as
/// an averaging weight.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    temperature: f32,
    humidity: f32,
    scale: Scale,
    weight: u32,
}

impl Default for Measurement {
    fn default() -> Self {
        Measurement::new(20.0, 40.0, Scale::Celsius)
    }
}

impl Measurement {
    /// Creates a single-sample measurement. Values are stored as given.
    pub const fn new(temperature: f32, humidity: f32, scale: Scale) -> Self {
        Measurement {
            temperature,
            humidity,
            scale,
            weight: 1,
        }
    }

    /// Creates a measurement that already stands for `weight` readings.
    pub const fn with_weight(
        temperature: f32,
        humidity: f32,
        scale: Scale,
        weight: NonZeroU32,
    ) -> Self {
        Measurement {
            temperature,
            humidity,
            scale,
            weight: weight.get(),
        }
    }

    /// Temperature in [`Measurement::scale`].
    pub const fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Relative humidity in percent.
    pub const fn humidity(&self) -> f32 {
        self.humidity
    }

    pub const fn scale(&self) -> Scale {
        self.scale
    }

    /// Averaging weight, always at least 1.
    pub const fn weight(&self) -> u32 {
        self.weight
    }

    /// Converts the temperature to `target` in place.
    ///
    /// Conversions between Fahrenheit and Kelvin go through Celsius.
    pub fn convert_scale(&mut self, target: Scale) {
        if self.scale == target {
            return;
        }
        if self.scale != Scale::Celsius {
            self.temperature = self.scale.to_celsius(self.temperature);
            self.scale = Scale::Celsius;
        }
        if target != Scale::Celsius {
            self.temperature = target.express(self.temperature);
            self.scale = target;
        }
    }

    /// Returns a copy of this measurement converted to `target`.
    pub fn in_scale(mut self, target: Scale) -> Self {
        self.convert_scale(target);
        self
    }

    /// Folds `other` into this measurement as a weighted running average.
    ///
    /// When the scales differ both sides are brought to Celsius first, so the
    /// receiver ends up in Celsius. The weight grows by one per call no matter
    /// how many readings `other` represents.
    pub fn combine(&mut self, mut other: Measurement) {
        if self.scale != other.scale {
            self.convert_scale(Scale::Celsius);
            other.convert_scale(Scale::Celsius);
        }

        let weight = self.weight as f32;
        let other_weight = other.weight as f32;
        let total = weight + other_weight;

        self.temperature = (self.temperature * weight + other.temperature * other_weight) / total;
        self.humidity = (self.humidity * weight + other.humidity * other_weight) / total;
        self.weight = self.weight.saturating_add(1);
    }

    /// The temperature half of the display form, e.g. `Temperature: 21.50 C`.
    pub fn temperature_display(&self) -> TemperatureDisplay {
        TemperatureDisplay {
            value: self.temperature,
            scale: self.scale,
        }
    }

    /// The humidity half of the display form, e.g. `Humidity: 40.00%`.
    pub fn humidity_display(&self) -> HumidityDisplay {
        HumidityDisplay(self.humidity)
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}",
            self.temperature_display(),
            self.humidity_display()
        )
    }
}

/// Formats a temperature with its unit suffix.
#[derive(Clone, Copy, Debug)]
pub struct TemperatureDisplay {
    value: f32,
    scale: Scale,
}

impl fmt::Display for TemperatureDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Temperature: {:.2} {}", self.value, self.scale.suffix())
    }
}

/// Formats a relative humidity as a percentage.
#[derive(Clone, Copy, Debug)]
pub struct HumidityDisplay(f32);

impl fmt::Display for HumidityDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Humidity: {:.2}%", self.0)
    }
}
