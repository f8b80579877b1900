//! Fuzz the console command parser: arbitrary bytes must never panic and
//! must only ever match the fixed command set.

#![no_main]

use fogpen::app::commands::ConsoleCommand;
use libfuzzer_sys::fuzz_target;

const COMMAND_SET: [&str; 10] = [
    "off", "on", "bvm", "cyc l50", "cyc m50", "cyc count", "ui leds", "bv", "p bvm on",
    "p bvm off",
];

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = core::str::from_utf8(data) {
        if ConsoleCommand::parse(line).is_some() {
            assert!(COMMAND_SET.contains(&line));
        }
    }
});
