use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{present, EntityKind, RegistryEntity};
use crate::validation::RequiredFields;

/// Serialization of an information model's RDF document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RdfFormat {
    #[serde(rename = "TURTLE", alias = "Turtle")]
    Turtle,
    #[serde(rename = "RDF_XML", alias = "RDFXML")]
    RdfXml,
    #[serde(rename = "N_TRIPLES", alias = "NTriples")]
    NTriples,
    #[serde(rename = "JSON_LD", alias = "JSONLD")]
    JsonLd,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InformationModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub uri: Option<String>,

    #[serde(default)]
    pub owner: Option<String>,

    #[serde(default)]
    pub rdf: Option<String>,

    #[serde(default)]
    pub rdf_format: Option<RdfFormat>,
}

impl RegistryEntity for InformationModel {
    const KIND: EntityKind = EntityKind::InformationModel;

    fn id(&self) -> Option<&str> {
        present(self.id.as_ref())
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        RequiredFields::new()
            .text("name", self.name.as_deref())
            .text("uri", self.uri.as_deref())
            .text("owner", self.owner.as_deref())
            .text("rdf", self.rdf.as_deref())
            .present("rdfFormat", self.rdf_format.is_some())
            .finish()
    }

    fn owner(&self) -> Option<&str> {
        present(self.owner.as_ref())
    }

    fn log_summary(&self, context: &str) {
        // rdf bodies can be large; only the size is logged
        debug!(
            context,
            information_model_id = ?self.id,
            name = ?self.name,
            uri = ?self.uri,
            owner = ?self.owner(),
            rdf_format = ?self.rdf_format,
            rdf_len = self.rdf.as_ref().map(String::len).unwrap_or(0),
            "InformationModel"
        );
    }
}
