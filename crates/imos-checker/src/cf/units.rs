//! Unit compatibility for the units strings IMOS files carry.
//!
//! This is not a units library: it knows the physical quantity behind the
//! unit spellings found in marine datasets, and two units are convertible
//! when they measure the same quantity. Anything unknown is not convertible.

/// Physical quantity measured by a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    Length,
    Time,
    /// `"<time unit> since <epoch>"`
    ReferenceTime,
    Angle,
    Temperature,
    Pressure,
    Velocity,
    Dimensionless,
}

const LENGTH_UNITS: &[&str] = &[
    "m", "meter", "meters", "metre", "metres", "km", "kilometer", "kilometers", "kilometre",
    "kilometres", "cm", "centimeter", "centimeters", "centimetre", "centimetres", "mm",
    "millimeter", "millimeters", "millimetre", "millimetres", "ft", "foot", "feet", "mile",
    "miles", "nautical_mile", "nautical_miles",
];

const TIME_UNITS: &[&str] = &[
    "s", "sec", "secs", "second", "seconds", "min", "mins", "minute", "minutes", "h", "hr",
    "hrs", "hour", "hours", "d", "day", "days", "week", "weeks",
];

const ANGLE_UNITS: &[&str] = &[
    "degree", "degrees", "degree_north", "degrees_north", "degree_N", "degrees_N", "degreeN",
    "degreesN", "degree_east", "degrees_east", "degree_E", "degrees_E", "degreeE", "degreesE",
    "rad", "radian", "radians", "arc_degree", "arc_degrees",
];

const TEMPERATURE_UNITS: &[&str] = &[
    "K", "kelvin", "degC", "deg_C", "celsius", "Celsius", "degree_Celsius", "degrees_Celsius",
    "degF", "fahrenheit", "degree_Fahrenheit", "degrees_Fahrenheit",
];

const PRESSURE_UNITS: &[&str] = &[
    "Pa", "pascal", "hPa", "kPa", "dbar", "decibar", "decibars", "bar", "bars", "mbar",
    "millibar", "millibars", "atm",
];

const VELOCITY_UNITS: &[&str] = &[
    "m s-1", "m/s", "m s^-1", "cm s-1", "cm/s", "mm s-1", "mm/s", "km h-1", "km/h", "knot",
    "knots", "kt",
];

const DIMENSIONLESS_UNITS: &[&str] = &["1", "percent", "%", "ppt", "psu", "PSU"];

/// Quantity measured by `units`, or `None` for spellings not in the tables.
pub fn quantity_of(units: &str) -> Option<Quantity> {
    let units = units.trim();
    if units.is_empty() {
        return None;
    }

    if let Some((unit, epoch)) = units.split_once(" since ") {
        return (is_one_of(unit.trim(), TIME_UNITS) && !epoch.trim().is_empty())
            .then_some(Quantity::ReferenceTime);
    }

    let tables: [(&[&str], Quantity); 7] = [
        (LENGTH_UNITS, Quantity::Length),
        (TIME_UNITS, Quantity::Time),
        (ANGLE_UNITS, Quantity::Angle),
        (TEMPERATURE_UNITS, Quantity::Temperature),
        (PRESSURE_UNITS, Quantity::Pressure),
        (VELOCITY_UNITS, Quantity::Velocity),
        (DIMENSIONLESS_UNITS, Quantity::Dimensionless),
    ];

    tables
        .iter()
        .find(|(table, _)| is_one_of(units, table))
        .map(|(_, quantity)| *quantity)
}

/// Whether a value in `from` units can be expressed in `to` units.
pub fn units_convertible(from: &str, to: &str) -> bool {
    match (quantity_of(from), quantity_of(to)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn is_one_of(units: &str, table: &[&str]) -> bool {
    table.contains(&units)
}
