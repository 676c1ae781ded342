//! Console output helpers for CLI

use crate::pipeline::TrainingResult;

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print the summary of a training or evaluation run
pub fn print_result(title: &str, result: &TrainingResult) {
    print_section(title);
    print_kv("Episodes", &format_number(result.episodes));
    print_kv("Catches", &format_number(result.catches));
    print_kv("Escapes", &format_number(result.escapes));
    print_kv("Catch rate", &format!("{:.1}%", result.catch_rate * 100.0));
    print_kv("Mean steps", &format!("{:.2}", result.mean_steps));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }
}
