//! Developer console command set.
//!
//! Commands are matched exactly and case-sensitively against the raw
//! input line — no abbreviations, no argument parsing.  Anything that
//! does not match is a silent no-op.

/// Commands the developer console can send into the control core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// `off` — disengage the coil.
    FireOff,
    /// `on` — engage the coil.
    FireOn,
    /// `bvm` — trigger a battery measurement now.
    MeasureBattery,
    /// `cyc l50` — print loop cycles counted during the last 50 ms pulse.
    PrintLastCycles,
    /// `cyc m50` — print the minimum cycles seen between two pulses.
    PrintMinCycles,
    /// `cyc count` — print the free-running main cycle counter.
    PrintCycleCount,
    /// `ui leds` — print indicator status.
    PrintIndicator,
    /// `bv` — print the stored under-load battery reading.
    PrintBatteryVoltage,
    /// `p bvm on` — echo every battery reading to the console.
    EchoReadingsOn,
    /// `p bvm off` — stop echoing battery readings.
    EchoReadingsOff,
}

impl ConsoleCommand {
    /// Parse a console line.  Returns `None` for anything that is not an
    /// exact match; the caller ignores such lines silently.
    pub fn parse(line: &str) -> Option<Self> {
        match line {
            "off" => Some(Self::FireOff),
            "on" => Some(Self::FireOn),
            "bvm" => Some(Self::MeasureBattery),
            "cyc l50" => Some(Self::PrintLastCycles),
            "cyc m50" => Some(Self::PrintMinCycles),
            "cyc count" => Some(Self::PrintCycleCount),
            "ui leds" => Some(Self::PrintIndicator),
            "bv" => Some(Self::PrintBatteryVoltage),
            "p bvm on" => Some(Self::EchoReadingsOn),
            "p bvm off" => Some(Self::EchoReadingsOff),
            _ => None,
        }
    }
}
