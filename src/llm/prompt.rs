use crate::db::SchemaMap;

/// Renders the schema and the user's question into a single completion prompt.
pub fn build_prompt(schema: &SchemaMap, question: &str) -> String {
    format!(
        "Convert to SQL query. Return only the SQL query without any markdown, explanation or comments. Database schema: {}. Query: {}",
        describe_schema(schema),
        question
    )
}

fn describe_schema(schema: &SchemaMap) -> String {
    schema
        .iter()
        .map(|(table, columns)| format!("Table '{}' with columns: {}", table, columns.join(", ")))
        .collect::<Vec<_>>()
        .join(". ")
}
