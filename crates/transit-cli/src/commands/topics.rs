//! Topics command implementation

use transit::{Category, ProjectionConfig};

pub fn execute(config: &ProjectionConfig) {
    println!("\nTopic Classification");
    println!("{}", "=".repeat(60));
    println!("A topic belongs to the first category whose pattern it contains.\n");
    for category in Category::ALL {
        println!(
            "  {:<18} <- *{}*",
            category.as_str(),
            config.topics.pattern(category)
        );
    }

    let lines: Vec<String> = config
        .network
        .lines
        .iter()
        .map(|color| format!("{} ({})", color, color.color_code()))
        .collect();
    println!("\nLines: {}", lines.join(", "));
    println!(
        "Dead letter capacity: {}",
        config.network.dead_letter_capacity
    );
}
