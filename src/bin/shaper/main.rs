//! shaper - Terminal transfer-curve editor
//!
//! Run with: cargo run
//!
//! Plays a sine tone through the curve while you edit it: add and drag
//! vertices, bend segments with tension, warp the x axis, and hear the
//! result live. The curve's persisted state string is printed on exit.

mod app;
mod ui;

use app::Shaper;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    Shaper::new().frequency(110.0).drive(1.5).run()
}
