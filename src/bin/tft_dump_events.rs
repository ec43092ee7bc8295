use anyhow::Result;

#[cfg(not(target_os = "linux"))]
fn main() -> Result<()> {
    anyhow::bail!("tft-dump-events is only supported on Linux");
}

#[cfg(target_os = "linux")]
fn main() -> Result<()> {
    dump::run()
}

#[cfg(target_os = "linux")]
mod dump {
    use std::{fs::File, io::BufReader, path::PathBuf};

    use anyhow::{Context, Result};
    use clap::Parser;
    use tftmenu::{
        menu::InputEvent,
        platform::evdev::{RawEvent, TouchTracker},
    };

    /// Prints raw records from an input event device, for wiring up touch screens.
    #[derive(Parser, Debug)]
    #[command(name = "tft-dump-events", version)]
    struct Cli {
        /// Event device to read.
        #[arg(default_value = "/dev/input/touchscreen")]
        input: PathBuf,

        /// Quit after the first event received.
        #[arg(short = '1', long)]
        one: bool,

        /// Print decoded pointer events (uncalibrated) instead of raw records.
        #[arg(long)]
        pointer: bool,
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();
        let file = File::open(&cli.input)
            .with_context(|| format!("opening {}", cli.input.display()))?;
        let mut reader = BufReader::new(file);
        let mut tracker = TouchTracker::new(None, (0, 0));
        let mut decoded = Vec::new();

        while let Some(ev) = RawEvent::read_from(&mut reader)
            .with_context(|| format!("reading {}", cli.input.display()))?
        {
            if cli.pointer {
                tracker.push(&ev, &mut decoded);
                for event in decoded.drain(..) {
                    match event {
                        InputEvent::Pointer(p) => println!("{:?} at ({}, {})", p.kind, p.x, p.y),
                        InputEvent::Quit => println!("Quit"),
                    }
                }
            } else {
                println!("{}", describe(&ev));
            }

            if cli.one {
                break;
            }
        }
        Ok(())
    }

    /// One raw record; the value is shown as the kernel's unsigned field.
    pub fn describe(ev: &RawEvent) -> String {
        if ev.is_separator() {
            "===========================================".to_string()
        } else {
            format!(
                "Event type {}, code {}, value {} at {}.{}",
                ev.kind, ev.code, ev.value as u32, ev.sec, ev.usec
            )
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn raw(kind: u16, code: u16, value: i32) -> RawEvent {
            RawEvent {
                sec: 12,
                usec: 5,
                kind,
                code,
                value,
            }
        }

        #[test]
        fn negative_values_print_unsigned() {
            assert_eq!(
                describe(&raw(3, 0, -1)),
                "Event type 3, code 0, value 4294967295 at 12.5"
            );
            assert_eq!(
                describe(&raw(1, 330, 1)),
                "Event type 1, code 330, value 1 at 12.5"
            );
        }

        #[test]
        fn zero_record_is_a_separator() {
            assert!(describe(&raw(0, 0, 0)).starts_with("====="));
        }
    }
}
