use crate::ref_type::RefType;
use crate::reference::{int_or_empty, str_or_empty, Reference};
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct ReferenceRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Tag")]
    tag: String,
    #[tabled(rename = "Type")]
    type_name: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Year")]
    year: String,
}

#[derive(Tabled)]
struct TypeRow {
    #[tabled(rename = "Id")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
}

fn render<T: Tabled>(rows: &[T]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let rows: Vec<StatRow> = stats
        .iter()
        .map(|(label, value)| StatRow {
            metric: label.to_string(),
            value: value.to_string(),
        })
        .collect();
    render(&rows)
}

/// Render references next to their resolved type names.
///
/// A `None` name (dangling `type_id`) is shown as `?`.
pub fn references_table(references: &[Reference], type_names: &[Option<String>]) -> String {
    let rows: Vec<ReferenceRow> = references
        .iter()
        .zip(type_names)
        .map(|(r, type_name)| ReferenceRow {
            id: int_or_empty(r.id),
            tag: r.tag(),
            type_name: type_name.clone().unwrap_or_else(|| "?".to_string()),
            author: str_or_empty(&r.author).to_string(),
            title: str_or_empty(&r.title).to_string(),
            year: int_or_empty(r.year),
        })
        .collect();
    render(&rows)
}

pub fn types_table(types: &[RefType]) -> String {
    let rows: Vec<TypeRow> = types
        .iter()
        .map(|t| TypeRow { id: t.id, name: t.name.clone() })
        .collect();
    render(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tables_render_nothing() {
        assert!(types_table(&[]).is_empty());
        assert!(references_table(&[], &[]).is_empty());
    }

    #[test]
    fn test_references_table_contents() {
        let refs = vec![Reference::new().with_id(5).with_author("Jane Doe").with_year(2020).with_type_id(9)];
        let table = references_table(&refs, &[None]);
        assert!(table.contains("5Doe2020"));
        assert!(table.contains('?'));
    }
}
