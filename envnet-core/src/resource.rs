//! Resource - Declared resources and their attribute values

use std::collections::HashMap;

/// Unique identifier for a resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    /// Resource type (e.g., "ec2_vpc", "ec2_subnet")
    pub resource_type: String,
    /// Binding name, unique within a stack (e.g., "public_subnet_a")
    pub name: String,
}

impl ResourceId {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.resource_type, self.name)
    }
}

/// Attribute value of a resource
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Bool(bool),
    List(Vec<Value>),
    Map(HashMap<String, Value>),
    /// Reference to another resource's attribute (binding_name, attribute_name)
    ResourceRef(String, String),
}

impl Value {
    /// Reference to the physical id of another resource
    pub fn reference(binding: impl Into<String>) -> Self {
        Value::ResourceRef(binding.into(), "id".to_string())
    }

    /// Reference to a named attribute of another resource
    pub fn attribute(binding: impl Into<String>, attribute: impl Into<String>) -> Self {
        Value::ResourceRef(binding.into(), attribute.into())
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Desired state of one resource
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub id: ResourceId,
    pub attributes: HashMap<String, Value>,
    /// Bindings that must exist before this resource, beyond those it references
    pub depends_on: Vec<String>,
}

impl Resource {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ResourceId::new(resource_type, name),
            attributes: HashMap::new(),
            depends_on: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn with_dependency(mut self, binding: impl Into<String>) -> Self {
        let binding = binding.into();
        if !self.depends_on.contains(&binding) {
            self.depends_on.push(binding);
        }
        self
    }

    /// Add a tag, creating the `tags` map on first use
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let tags = self
            .attributes
            .entry("tags".to_string())
            .or_insert_with(|| Value::Map(HashMap::new()));
        if let Value::Map(map) = tags {
            map.insert(key.into(), Value::String(value.into()));
        }
        self
    }

    pub fn binding(&self) -> &str {
        &self.id.name
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Value of a tag, if set
    pub fn tag(&self, key: &str) -> Option<&str> {
        match self.attributes.get("tags") {
            Some(Value::Map(map)) => map.get(key).and_then(Value::as_str),
            _ => None,
        }
    }
}
