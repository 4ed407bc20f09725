//! Units of measurement for numeric fields
//!
//! Descriptive metadata only: nothing here is executed against values.

/// One selectable unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit {
    pub key: &'static str,
    pub label: &'static str,
}

/// A unit category and its options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    pub key: &'static str,
    pub label: &'static str,
    pub units: &'static [Unit],
}

impl Measurement {
    /// Looks up a unit by key
    pub fn unit(&self, key: &str) -> Option<&'static Unit> {
        self.units.iter().find(|unit| unit.key == key)
    }
}

const fn unit(key: &'static str, label: &'static str) -> Unit {
    Unit { key, label }
}

/// Measurement table of the `number` type
pub static MEASUREMENTS: &[Measurement] = &[
    Measurement {
        key: "currency",
        label: "Currency",
        units: &[unit("usd", "USD ($)"), unit("eur", "EUR (€)")],
    },
    Measurement {
        key: "distance",
        label: "Distance",
        units: &[
            unit("millimeter", "Millimeters (mm)"),
            unit("centimeter", "Centimeters (cm)"),
            unit("meter", "Meters (m)"),
            unit("kilometer", "Kilometers (km)"),
        ],
    },
    Measurement {
        key: "duration",
        label: "Duration",
        units: &[
            unit("nanosecond", "Nanosecond (ns)"),
            unit("millisecond", "Millisecond (ms)"),
            unit("second", "Second (s)"),
            unit("minute", "Minute (min)"),
            unit("hour", "Hour (h)"),
        ],
    },
    Measurement {
        key: "datePart",
        label: "Date Segment",
        units: &[
            unit("hourOfDay", "Hour of Day (0-23)"),
            unit("dayOfWeek", "Day of Week (1-7)"),
            unit("dayOfMonth", "Day of Month (01-31)"),
            unit("dayOfYear", "Day of Year (0-366)"),
            unit("monthOfYear", "Month of Year (01-12)"),
        ],
    },
    Measurement {
        key: "speed",
        label: "Speed",
        units: &[unit("kilometer", "km/h")],
    },
    Measurement {
        key: "area",
        label: "Area",
        units: &[
            unit("millimeter", "Millimeters (mm²)"),
            unit("centimeter", "Centimeters (cm²)"),
            unit("meter", "Meters (m²)"),
            unit("kilometer", "Kilometers (km²)"),
            unit("hectare", "Hectares (ha)"),
        ],
    },
    Measurement {
        key: "temperature",
        label: "Temperature",
        units: &[unit("celsius", "Celsius (°C)")],
    },
    Measurement {
        key: "angle",
        label: "Angle",
        units: &[unit("degree", "Degrees (°)"), unit("radian", "Radians (rad)")],
    },
    Measurement {
        key: "percentage",
        label: "Percentage",
        units: &[unit("decimal", "Decimal (0-1)")],
    },
    Measurement {
        key: "concentration",
        label: "Concentration",
        units: &[unit("microgram", "Micrograms per cubic meter (µg/m³)")],
    },
];

/// Looks up a measurement category by key
pub fn measurement(key: &str) -> Option<&'static Measurement> {
    MEASUREMENTS.iter().find(|m| m.key == key)
}
