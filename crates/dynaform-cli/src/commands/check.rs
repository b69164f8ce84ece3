use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use dynaform::FormSchema;

use super::load_schema;

pub fn execute(path: &Path) -> Result<()> {
    println!("{}", "Checking schema...".green().bold());
    println!();

    let schema = load_schema(path)?;
    report(&schema)
}

fn report(schema: &FormSchema) -> Result<()> {
    let dependents = schema
        .fields
        .iter()
        .filter(|spec| spec.depends_on.is_some())
        .count();
    println!("Fields: {}", schema.len().to_string().cyan());
    println!("Dependent fields: {}", dependents.to_string().cyan());
    println!();

    match schema.check() {
        Ok(()) => {
            println!("{}", "Schema is valid".green().bold());
            Ok(())
        }
        Err(err) => {
            for issue in &err.issues {
                println!("  {} {}", "✗".red(), issue);
            }
            println!();
            anyhow::bail!("{} issue(s) found", err.issues.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynaform::{FieldSpec, FieldType};

    #[test]
    fn test_report_fails_on_issues() {
        let schema = FormSchema::new(vec![
            FieldSpec::new("state", FieldType::Text).depends_on("country", "US"),
        ]);
        let err = report(&schema).unwrap_err();
        assert_eq!(err.to_string(), "1 issue(s) found");
    }

    #[test]
    fn test_report_accepts_clean_schema() {
        let schema = FormSchema::new(vec![FieldSpec::new("name", FieldType::Text)]);
        assert!(report(&schema).is_ok());
    }
}
