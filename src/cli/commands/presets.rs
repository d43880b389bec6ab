//! List analysis presets.

use console::style;

use crate::llm::PRESETS;

pub fn cmd_presets() {
    for preset in PRESETS {
        println!("{}", style(preset.key).bold());
        println!("  {}", style(preset.prompt).dim());
    }
}
