use crate::directive::{Directive, NodeManipulator};
use crate::error::DirectiveError;
use crate::types::{FieldDefinition, TypeDefinition};

/// Interface added to every type carrying `@node`.
pub const NODE_INTERFACE: &str = "Node";

/// Makes a type globally identifiable: implements `Node` and has `id: ID!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeDirective;

impl Directive for NodeDirective {
    fn name(&self) -> &str {
        "node"
    }

    fn as_node_manipulator(&self) -> Option<&dyn NodeManipulator> {
        Some(self)
    }
}

impl NodeManipulator for NodeDirective {
    fn manipulate_type(&self, ty: &mut TypeDefinition) -> Result<(), DirectiveError> {
        if !ty.interfaces.iter().any(|i| i == NODE_INTERFACE) {
            ty.interfaces.push(NODE_INTERFACE.to_string());
        }
        if ty.find_field("id").is_none() {
            ty.fields.insert(0, FieldDefinition::new("id", "ID!"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_interface_and_id_once() {
        let mut ty = TypeDefinition::new("User");
        ty.fields.push(FieldDefinition::new("name", "String"));

        NodeDirective.manipulate_type(&mut ty).unwrap();
        NodeDirective.manipulate_type(&mut ty).unwrap();

        assert_eq!(ty.interfaces, vec!["Node"]);
        let names: Vec<&str> = ty.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name"]);
    }
}
