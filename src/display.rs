use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::Local;

use crate::schedule::{AssignmentResult, Position, Vocabulary};

/// Joins the names of one section for a single report line
pub fn format_names(names: &[String]) -> String {
    if names.is_empty() {
        "[EMPTY]".to_string()
    } else {
        names.join(", ")
    }
}

/// Renders the result, one line per section: `Area/Section (n): names`
pub fn render_assignment(result: &AssignmentResult, vocabulary: &Vocabulary) -> Vec<String> {
    Position::ALL
        .into_iter()
        .map(|position| {
            let names = result.section(position);
            format!(
                "{}/{} ({}): {}",
                vocabulary.area_label(position.area),
                vocabulary.section_label(position.section),
                names.len(),
                format_names(names)
            )
        })
        .collect()
}

/// Writes the result to a file, headed with the time it was produced
pub fn write_assignment_to_file<P: AsRef<Path>>(
    result: &AssignmentResult,
    vocabulary: &Vocabulary,
    filename: P,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(filename)?;

    writeln!(file, "** Staff allocation ({}) **", Local::now().format("%Y-%m-%d %H:%M"))?;
    for line in render_assignment(result, vocabulary) {
        writeln!(file, "{}", line)?;
    }

    Ok(())
}

/// Prints the result in a readable format
pub fn print_assignment(result: &AssignmentResult, vocabulary: &Vocabulary) {
    println!("\n=== Staff Allocation ===");
    println!("Total staff assigned: {}", result.total_assigned());
    for line in render_assignment(result, vocabulary) {
        println!("  {}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{AreaAssignment, Vocabulary};

    fn result() -> AssignmentResult {
        AssignmentResult {
            inbound: AreaAssignment {
                front: vec!["Alice".into(), "Bob".into()],
                back: vec![],
            },
            outbound: AreaAssignment {
                front: vec![],
                back: vec!["Cara".into()],
            },
        }
    }

    #[test]
    fn test_render_lines() {
        let lines = render_assignment(&result(), &Vocabulary::default());
        assert_eq!(
            lines,
            vec![
                "Inbound/Front (2): Alice, Bob",
                "Inbound/Back (0): [EMPTY]",
                "Outbound/Front (0): [EMPTY]",
                "Outbound/Back (1): Cara",
            ]
        );
    }

    #[test]
    fn test_render_uses_vocabulary() {
        let vocabulary = Vocabulary::new("入境", "出境", "前台", "后台");
        let lines = render_assignment(&result(), &vocabulary);
        assert_eq!(lines[3], "出境/后台 (1): Cara");
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("allocation.txt");
        write_assignment_to_file(&result(), &Vocabulary::default(), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert!(lines.next().unwrap().starts_with("** Staff allocation ("));
        assert_eq!(lines.next(), Some("Inbound/Front (2): Alice, Bob"));
        assert_eq!(contents.lines().count(), 5);
    }
}
