pub fn generate_typescript_definitions(
    type_names: &[&str],
) -> Result<String, Box<dyn std::error::Error>> {
    if type_names.is_empty() {
        return Err("No type names provided".into());
    }

    let mut definitions = Vec::new();

    for name in type_names {
        let type_def = export_type(name)?;
        let cleaned = clean_type(type_def);

        if !cleaned.trim().is_empty() {
            definitions.push(cleaned);
        }
    }

    Ok(definitions.join("\n\n"))
}

/// Every type the API puts on the wire, in the order clients usually want them.
pub const API_TYPE_NAMES: &[&str] = &[
    "FileInfo",
    "FileListResponse",
    "FileUploadResponse",
    "MessageInfo",
    "MessageListResponse",
    "CreateMessageRequest",
    "CreateMessageResponse",
    "HelloResponse",
];

fn export_type(name: &str) -> Result<String, Box<dyn std::error::Error>> {
    use crate::*;
    use ts_rs::TS;

    let result = match name {
        "FileInfo" => FileInfo::export_to_string()?,
        "FileListResponse" => FileListResponse::export_to_string()?,
        "FileUploadResponse" => FileUploadResponse::export_to_string()?,

        "MessageInfo" => MessageInfo::export_to_string()?,
        "MessageListResponse" => MessageListResponse::export_to_string()?,
        "CreateMessageRequest" => CreateMessageRequest::export_to_string()?,
        "CreateMessageResponse" => CreateMessageResponse::export_to_string()?,

        "HelloResponse" => HelloResponse::export_to_string()?,

        _ => {
            return Err(format!(
                "Unknown type: '{}'. Available types can be found in shared-types/src/",
                name
            )
            .into());
        }
    };

    Ok(result)
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    let lines: Vec<&str> = type_def.lines().collect();

    let filtered: Vec<&str> = lines
        .iter()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
        })
        .cloned()
        .collect();

    filtered.join("\n").trim().to_string()
}
