use serde::Deserialize;

/// Node classification returned by the listing endpoint. The workspace also
/// contains LIBRARY / FILE / REPO nodes; the walker ignores those.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ObjectType {
    #[serde(rename = "NOTEBOOK")]
    Notebook,
    #[serde(rename = "DIRECTORY")]
    Directory,
    #[serde(other)]
    Other,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Notebook => "NOTEBOOK",
            ObjectType::Directory => "DIRECTORY",
            ObjectType::Other => "OTHER",
        }
    }
}

/// One node of the workspace tree as reported by `/workspace/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceObject {
    pub object_type: ObjectType,
    pub path: String,
    pub object_id: u64,
    /// Present only for notebooks.
    #[serde(default)]
    pub language: Option<String>,
}

/// Response from `/workspace/list`. A missing `objects` field means the
/// directory is empty.
#[derive(Debug, Default, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub objects: Vec<WorkspaceObject>,
}

/// Response from `/workspace/export`. `content` is base64-encoded UTF-8;
/// its absence means the notebook has nothing exportable.
#[derive(Debug, Default, Deserialize)]
pub struct ExportResponse {
    #[serde(default)]
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_response_deserialize() {
        let json = r#"{
            "objects": [
                {"object_type": "DIRECTORY", "path": "/Shared", "object_id": 1},
                {"object_type": "NOTEBOOK", "path": "/etl", "object_id": 2, "language": "PYTHON"}
            ]
        }"#;
        let resp: ListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.objects.len(), 2);
        assert_eq!(resp.objects[0].object_type, ObjectType::Directory);
        assert!(resp.objects[0].language.is_none());
        assert_eq!(resp.objects[1].object_type, ObjectType::Notebook);
        assert_eq!(resp.objects[1].language.as_deref(), Some("PYTHON"));
        assert_eq!(resp.objects[1].object_id, 2);
    }

    #[test]
    fn test_list_response_empty_directory() {
        let resp: ListResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.objects.is_empty());
    }

    #[test]
    fn test_unknown_object_type_maps_to_other() {
        let json = r#"{"object_type": "LIBRARY", "path": "/lib", "object_id": 9}"#;
        let obj: WorkspaceObject = serde_json::from_str(json).unwrap();
        assert_eq!(obj.object_type, ObjectType::Other);
    }

    #[test]
    fn test_export_response_with_and_without_content() {
        let resp: ExportResponse = serde_json::from_str(r#"{"content": "cHJpbnQoMSk="}"#).unwrap();
        assert_eq!(resp.content.as_deref(), Some("cHJpbnQoMSk="));

        let resp: ExportResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.content.is_none());
    }
}
