//! Models command - list the selectable models.

use colored::Colorize;
use opsanalyst::llm::DEFAULT_MODEL;
use opsanalyst::ModelId;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "Available models:".cyan().bold());
    for model in ModelId::all() {
        if model.as_str() == DEFAULT_MODEL {
            println!("  {} {}", model.as_str().white().bold(), "(default)".green());
        } else {
            println!("  {}", model.as_str());
        }
    }
    Ok(())
}
