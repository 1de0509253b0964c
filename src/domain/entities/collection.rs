use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Text,
    Int,
    Bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertySpec {
    pub name: &'static str,
    pub data_type: PropertyType,
    pub description: &'static str,
}

/// Fixed property schema for chunk collections. The vector is supplied
/// externally per record; the store must not compute its own embeddings.
/// Serialize-only: schemas are produced by `chunk_schema`, never read back.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionSchema {
    pub properties: Vec<PropertySpec>,
    pub dimension: usize,
}

impl CollectionSchema {
    pub fn property(&self, name: &str) -> Option<&PropertySpec> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// The canonical chunk schema, shared by both extraction methods.
pub fn chunk_schema(dimension: usize) -> CollectionSchema {
    CollectionSchema {
        dimension,
        properties: vec![
            PropertySpec {
                name: "content",
                data_type: PropertyType::Text,
                description: "The text content of the document chunk",
            },
            PropertySpec {
                name: "book_title",
                data_type: PropertyType::Text,
                description: "Title of the source PDF",
            },
            PropertySpec {
                name: "source_path",
                data_type: PropertyType::Text,
                description: "File path or URL of the PDF",
            },
            PropertySpec {
                name: "page_number",
                data_type: PropertyType::Int,
                description: "Page number in the PDF, 0 when unknown",
            },
            PropertySpec {
                name: "chunk_index",
                data_type: PropertyType::Int,
                description: "Index of this chunk in the document",
            },
            PropertySpec {
                name: "extraction_method",
                data_type: PropertyType::Text,
                description: "How the content was extracted (direct or vision)",
            },
            PropertySpec {
                name: "has_images",
                data_type: PropertyType::Bool,
                description: "Whether the source document contains image descriptions",
            },
            PropertySpec {
                name: "has_tables",
                data_type: PropertyType::Bool,
                description: "Whether the source document contains table data",
            },
            PropertySpec {
                name: "has_formulas",
                data_type: PropertyType::Bool,
                description: "Whether the source document contains formulas",
            },
        ],
    }
}

/// Normalizes a raw lesson slug into a valid collection class name:
/// non-alphanumerics removed, parts CamelCased, leading letter guaranteed.
pub fn format_collection_name(name: &str) -> String {
    if name.is_empty() {
        return "UnnamedCollection".to_string();
    }

    let formatted: String = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect();

    if formatted.is_empty() {
        return "UnnamedCollection".to_string();
    }

    if formatted.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        formatted
    } else {
        format!("A{formatted}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_collection_name_camel_cases_parts() {
        assert_eq!(format_collection_name("my lesson_book-3"), "MyLessonBook3");
    }

    #[test]
    fn test_format_collection_name_leading_digit() {
        assert_eq!(format_collection_name("3rd-grade"), "A3rdGrade");
    }

    #[test]
    fn test_format_collection_name_empty() {
        assert_eq!(format_collection_name(""), "UnnamedCollection");
        assert_eq!(format_collection_name("!!!"), "UnnamedCollection");
    }

    #[test]
    fn test_chunk_schema_serializes() {
        let value = serde_json::to_value(chunk_schema(8)).unwrap();
        assert_eq!(value["dimension"], 8);
        assert_eq!(value["properties"][0]["name"], "content");
        assert_eq!(value["properties"][0]["data_type"], "text");
    }

    #[test]
    fn test_chunk_schema_has_all_metadata_fields() {
        let schema = chunk_schema(3072);
        for field in [
            "content",
            "book_title",
            "source_path",
            "page_number",
            "chunk_index",
            "extraction_method",
            "has_images",
            "has_tables",
            "has_formulas",
        ] {
            assert!(schema.property(field).is_some(), "missing {field}");
        }
        assert_eq!(
            schema.property("page_number").unwrap().data_type,
            PropertyType::Int
        );
        assert_eq!(
            schema.property("has_images").unwrap().data_type,
            PropertyType::Bool
        );
    }
}
