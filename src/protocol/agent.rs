//! Agent discovery types: the Agent Card, its builder, and role templates
//!
//! The Agent Card is published at `/.well-known/agent-card.json` and
//! advertises the agent's skills and reachable transports. Cards are built
//! once at startup through [`AgentCardBuilder`] and served immutably.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::A2AError;

/// Agent Card for agent discovery
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentCard {
    /// Stable identifier of the agent
    pub id: String,

    /// Name of the agent
    pub name: String,

    /// Human-readable description of the agent
    pub description: String,

    /// Skills the agent advertises (at least one)
    pub skills: Vec<Skill>,

    /// Transports the agent is reachable over (at least one)
    pub transports: Vec<TransportEntry>,

    /// Owning organization or team
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Contact address for operational issues
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,

    /// Agent version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// URL to agent documentation
    #[serde(rename = "documentationUrl", skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
}

impl AgentCard {
    /// Create a new card builder
    pub fn builder() -> AgentCardBuilder {
        AgentCardBuilder::default()
    }
}

/// A capability the agent advertises
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Skill {
    /// Stable skill identifier, e.g. `search-repositories`
    pub id: String,

    /// Display name of the skill
    pub name: String,

    /// What the skill does
    pub description: String,

    /// JSON schema of the expected input
    #[serde(rename = "inputSchema", skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,

    /// JSON schema of the produced output
    #[serde(rename = "outputSchema", skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<Value>,

    /// Example invocations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
}

impl Skill {
    /// Create a skill with just the required fields
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            input_schema: None,
            output_schema: None,
            examples: None,
        }
    }

    /// Set the input schema
    pub fn with_input_schema(mut self, schema: Value) -> Self {
        self.input_schema = Some(schema);
        self
    }

    /// Set the output schema
    pub fn with_output_schema(mut self, schema: Value) -> Self {
        self.output_schema = Some(schema);
        self
    }

    /// Add an example invocation
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.examples
            .get_or_insert_with(Vec::new)
            .push(example.into());
        self
    }
}

/// A transport binding the agent serves
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransportEntry {
    /// Binding type, e.g. `jsonrpc`
    #[serde(rename = "type")]
    pub transport_type: String,

    /// Base URL of the binding
    pub url: String,

    /// Protocol name, e.g. `json-rpc-2.0`
    pub protocol: String,

    /// Authentication scheme required by this binding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<String>,
}

impl TransportEntry {
    /// Create a JSON-RPC 2.0 transport entry
    pub fn jsonrpc(url: impl Into<String>) -> Self {
        Self {
            transport_type: "jsonrpc".to_string(),
            url: url.into(),
            protocol: "json-rpc-2.0".to_string(),
            authentication: None,
        }
    }

    /// Require an authentication scheme on this binding
    pub fn with_authentication(mut self, scheme: impl Into<String>) -> Self {
        self.authentication = Some(scheme.into());
        self
    }
}

/// Fluent builder for [`AgentCard`]
#[derive(Debug, Default)]
pub struct AgentCardBuilder {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    skills: Vec<Skill>,
    transports: Vec<TransportEntry>,
    owner: Option<String>,
    contact: Option<String>,
    version: Option<String>,
    documentation_url: Option<String>,
}

impl AgentCardBuilder {
    /// Set the agent identifier
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the agent name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the agent description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a skill
    pub fn skill(mut self, skill: Skill) -> Self {
        self.skills.push(skill);
        self
    }

    /// Add several skills at once
    pub fn skills(mut self, skills: impl IntoIterator<Item = Skill>) -> Self {
        self.skills.extend(skills);
        self
    }

    /// Add a transport entry
    pub fn transport(mut self, transport: TransportEntry) -> Self {
        self.transports.push(transport);
        self
    }

    /// Set the owner
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Set the contact address
    pub fn contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    /// Set the version
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the documentation URL
    pub fn documentation_url(mut self, url: impl Into<String>) -> Self {
        self.documentation_url = Some(url.into());
        self
    }

    /// Validate and build the card.
    ///
    /// A card needs an id, a name, a description, at least one skill and at
    /// least one transport; the error message names the missing field.
    pub fn build(self) -> Result<AgentCard, A2AError> {
        let id = self
            .id
            .filter(|s| !s.is_empty())
            .ok_or_else(|| A2AError::Validation("Agent card requires an id".to_string()))?;
        let name = self
            .name
            .filter(|s| !s.is_empty())
            .ok_or_else(|| A2AError::Validation("Agent card requires a name".to_string()))?;
        let description = self.description.filter(|s| !s.is_empty()).ok_or_else(|| {
            A2AError::Validation("Agent card requires a description".to_string())
        })?;
        if self.skills.is_empty() {
            return Err(A2AError::Validation(
                "Agent card requires at least one skill".to_string(),
            ));
        }
        if self.transports.is_empty() {
            return Err(A2AError::Validation(
                "Agent card requires at least one transport".to_string(),
            ));
        }

        Ok(AgentCard {
            id,
            name,
            description,
            skills: self.skills,
            transports: self.transports,
            owner: self.owner,
            contact: self.contact,
            version: self.version,
            documentation_url: self.documentation_url,
        })
    }

    /// Build and serialize the card in one step
    pub fn build_json(self) -> Result<Value, A2AError> {
        let card = self.build()?;
        Ok(serde_json::to_value(card)?)
    }
}

/// One row of the role template table
struct RoleTemplate {
    role: &'static str,
    name: &'static str,
    description: &'static str,
    skills: &'static [(&'static str, &'static str, &'static str)],
}

/// Pre-filled skill tables for well-known agent roles.
///
/// Plain data keyed by role name; unknown roles return `None` and callers
/// fall back to building a card by hand.
const ROLE_TEMPLATES: &[RoleTemplate] = &[
    RoleTemplate {
        role: "github",
        name: "GitHub Agent",
        description: "Searches and inspects GitHub repositories",
        skills: &[
            (
                "search-repositories",
                "Search repositories",
                "Search GitHub repositories by keyword and language",
            ),
            (
                "get-repository",
                "Get repository",
                "Fetch metadata for a single repository",
            ),
        ],
    },
    RoleTemplate {
        role: "developer",
        name: "Developer Agent",
        description: "Answers questions about developers and their activity",
        skills: &[(
            "profile-developer",
            "Profile developer",
            "Summarize a developer's public activity",
        )],
    },
    RoleTemplate {
        role: "repository",
        name: "Repository Agent",
        description: "Analyzes a repository's structure and health",
        skills: &[(
            "analyze-repository",
            "Analyze repository",
            "Report on repository structure, activity and health",
        )],
    },
    RoleTemplate {
        role: "relationship",
        name: "Relationship Agent",
        description: "Maps relationships between projects and contributors",
        skills: &[(
            "map-relationships",
            "Map relationships",
            "Trace links between projects, forks and contributors",
        )],
    },
];

/// Look up a role template and return a pre-filled builder.
///
/// The caller still supplies the id and transport before `build()`.
pub fn template_for_role(role: &str) -> Option<AgentCardBuilder> {
    let template = ROLE_TEMPLATES.iter().find(|t| t.role == role)?;
    let skills = template
        .skills
        .iter()
        .map(|(id, name, description)| Skill::new(*id, *name, *description));
    Some(
        AgentCard::builder()
            .name(template.name)
            .description(template.description)
            .skills(skills),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_builder() {
        let card = AgentCard::builder()
            .id("agent-github")
            .name("GitHub Agent")
            .description("Searches GitHub")
            .skill(Skill::new("search", "Search", "Search repositories"))
            .transport(TransportEntry::jsonrpc("http://localhost:4310"))
            .version("1.0.0")
            .build()
            .unwrap();

        assert_eq!(card.id, "agent-github");
        assert_eq!(card.skills.len(), 1);
        assert_eq!(card.transports[0].protocol, "json-rpc-2.0");
        assert_eq!(card.version, Some("1.0.0".to_string()));
    }

    #[test]
    fn test_builder_rejects_missing_fields() {
        let err = AgentCard::builder()
            .name("No id")
            .description("x")
            .skill(Skill::new("s", "S", "d"))
            .transport(TransportEntry::jsonrpc("http://localhost:4310"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("id"));

        let err = AgentCard::builder()
            .id("a")
            .name("A")
            .description("x")
            .transport(TransportEntry::jsonrpc("http://localhost:4310"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("skill"));

        let err = AgentCard::builder()
            .id("a")
            .name("A")
            .description("x")
            .skill(Skill::new("s", "S", "d"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("transport"));
    }

    #[test]
    fn test_builder_rejects_empty_strings() {
        let err = AgentCard::builder()
            .id("")
            .name("A")
            .description("x")
            .skill(Skill::new("s", "S", "d"))
            .transport(TransportEntry::jsonrpc("http://localhost:4310"))
            .build()
            .unwrap_err();
        assert!(matches!(err, A2AError::Validation(_)));
    }

    #[test]
    fn test_role_templates() {
        let card = template_for_role("github")
            .unwrap()
            .id("agent-1")
            .transport(TransportEntry::jsonrpc("http://localhost:4310"))
            .build()
            .unwrap();

        assert_eq!(card.name, "GitHub Agent");
        assert!(card
            .skills
            .iter()
            .any(|s| s.id == "search-repositories"));

        assert!(template_for_role("unknown-role").is_none());
    }

    #[test]
    fn test_card_serialization() {
        let card = AgentCard::builder()
            .id("agent-1")
            .name("Test")
            .description("Description")
            .skill(
                Skill::new("s", "S", "d")
                    .with_example("do the thing")
                    .with_input_schema(serde_json::json!({"type": "object"})),
            )
            .transport(TransportEntry::jsonrpc("http://localhost:4310"))
            .documentation_url("https://docs.example.com")
            .build()
            .unwrap();

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["name"], "Test");
        assert_eq!(json["transports"][0]["type"], "jsonrpc");
        assert_eq!(json["skills"][0]["inputSchema"]["type"], "object");
        assert_eq!(json["documentationUrl"], "https://docs.example.com");
        assert!(json.get("owner").is_none());

        let deserialized: AgentCard = serde_json::from_value(json).unwrap();
        assert_eq!(card, deserialized);
    }
}
