//! WMO weather interpretation codes, as reported by Open-Meteo.
//! See: https://open-meteo.com/en/docs#weathervariables

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionDescriptor {
    pub label: &'static str,
    pub day_icon: &'static str,
    pub night_icon: &'static str,
}

impl ConditionDescriptor {
    const fn new(label: &'static str, day_icon: &'static str, night_icon: &'static str) -> Self {
        Self { label, day_icon, night_icon }
    }

    pub fn icon(&self, is_day: bool) -> &'static str {
        if is_day { self.day_icon } else { self.night_icon }
    }
}

pub const UNKNOWN_CONDITION: ConditionDescriptor = ConditionDescriptor::new("Unknown", "❓", "❓");

const TABLE: &[(i32, ConditionDescriptor)] = &[
    (0, ConditionDescriptor::new("Clear Sky", "☀️", "🌙")),
    (1, ConditionDescriptor::new("Mainly Clear", "🌤️", "🌙")),
    (2, ConditionDescriptor::new("Partly Cloudy", "⛅", "☁️")),
    (3, ConditionDescriptor::new("Overcast", "☁️", "☁️")),
    (45, ConditionDescriptor::new("Fog", "🌫️", "🌫️")),
    (48, ConditionDescriptor::new("Depositing Rime Fog", "🌫️", "🌫️")),
    (51, ConditionDescriptor::new("Light Drizzle", "🌦️", "🌧️")),
    (53, ConditionDescriptor::new("Moderate Drizzle", "🌦️", "🌧️")),
    (55, ConditionDescriptor::new("Dense Drizzle", "🌧️", "🌧️")),
    (61, ConditionDescriptor::new("Slight Rain", "🌦️", "🌧️")),
    (63, ConditionDescriptor::new("Moderate Rain", "🌧️", "🌧️")),
    (65, ConditionDescriptor::new("Heavy Rain", "⛈️", "⛈️")),
    (71, ConditionDescriptor::new("Slight Snow", "🌨️", "🌨️")),
    (73, ConditionDescriptor::new("Moderate Snow", "🌨️", "🌨️")),
    (75, ConditionDescriptor::new("Heavy Snow", "❄️", "❄️")),
    (80, ConditionDescriptor::new("Slight Rain Showers", "🌦️", "🌧️")),
    (81, ConditionDescriptor::new("Moderate Rain Showers", "🌧️", "🌧️")),
    (82, ConditionDescriptor::new("Violent Rain Showers", "⛈️", "⛈️")),
    (95, ConditionDescriptor::new("Thunderstorm", "⚡", "⚡")),
    (96, ConditionDescriptor::new("Thunderstorm with Hail", "⛈️", "⛈️")),
    (99, ConditionDescriptor::new("Thunderstorm with Heavy Hail", "⛈️", "⛈️")),
];

/// Look up a condition code. Never fails: unknown codes map to [`UNKNOWN_CONDITION`].
pub fn describe(code: i32) -> ConditionDescriptor {
    TABLE
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, d)| *d)
        .unwrap_or(UNKNOWN_CONDITION)
}
