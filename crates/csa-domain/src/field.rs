//! The catalog of contract fields requested from the model
//!
//! The order here is the order fields appear in the prompt and in the
//! `fields` listing. Template authors reference these names verbatim inside
//! `{{...}}` placeholders.

/// A single field the extraction prompt asks the model to fill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Exact key expected in the model's JSON object
    pub name: &'static str,

    /// Instruction shown to the model for this field
    pub description: &'static str,
}

impl FieldSpec {
    /// Look up a catalog entry by exact name
    pub fn find(name: &str) -> Option<&'static FieldSpec> {
        FIELD_CATALOG.iter().find(|spec| spec.name == name)
    }

    /// Whether a name belongs to the catalog
    pub fn is_known(name: &str) -> bool {
        Self::find(name).is_some()
    }
}

/// Every field requested from the model, in prompt order
pub const FIELD_CATALOG: [FieldSpec; 15] = [
    FieldSpec {
        name: "Supplier Name",
        description: "The name of the supplier company.",
    },
    FieldSpec {
        name: "Contract Title",
        description: "The title or subject of the contract.",
    },
    FieldSpec {
        name: "Contract Type",
        description: "Choose exactly one of the following options: \"New\", \"Renewal\", or \"Addendum\". Return exactly one of these options in the output. Do not return any other text.",
    },
    FieldSpec {
        name: "Brief Scope of Service/Supply",
        description: "A short description of the services or goods provided.",
    },
    FieldSpec {
        name: "Contract Value",
        description: "The total value or price in the contract.",
    },
    FieldSpec {
        name: "Payment Terms",
        description: "Any details about payment structure or schedule.",
    },
    FieldSpec {
        name: "Delivery Timelines",
        description: "Dates or timeframes for delivery.",
    },
    FieldSpec {
        name: "Warranty Details",
        description: "Details of any warranty provided.",
    },
    FieldSpec {
        name: "Payment Currency",
        description: "The currency used for payment (e.g., USD, PKR).",
    },
    FieldSpec {
        name: "Penalties",
        description: "Any penalties or charges mentioned for delays or non-performance.",
    },
    FieldSpec {
        name: "Date of Contract",
        description: "The date when the contract was signed or agreed upon.",
    },
    FieldSpec {
        name: "Effective Date",
        description: "The date when the contract terms start to apply.",
    },
    FieldSpec {
        name: "Commencement Date of Supply/Service (if different from Effective Date)",
        description: "The start date of actual supply or service, if different from the Effective Date.",
    },
    FieldSpec {
        name: "Term or Duration of Service/Supply",
        description: "The length or duration of the contract.",
    },
    FieldSpec {
        name: "Notice Period for Termination",
        description: "The period required to give notice before terminating the contract.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_names_are_unique() {
        let names: HashSet<_> = FIELD_CATALOG.iter().map(|f| f.name).collect();
        assert_eq!(names.len(), FIELD_CATALOG.len());
    }

    #[test]
    fn test_find_known_field() {
        let spec = FieldSpec::find("Contract Value").unwrap();
        assert!(spec.description.contains("total value"));
        assert!(FieldSpec::is_known("Supplier Name"));
    }

    #[test]
    fn test_find_is_exact_match() {
        assert!(FieldSpec::find("supplier name").is_none());
        assert!(FieldSpec::find("Supplier").is_none());
    }

    #[test]
    fn test_contract_type_lists_options() {
        let spec = FieldSpec::find("Contract Type").unwrap();
        for option in ["New", "Renewal", "Addendum"] {
            assert!(spec.description.contains(option));
        }
    }
}
