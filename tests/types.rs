// ABOUTME: Integration tests for type-safe identifiers and validated types.
// ABOUTME: Tests parsing, validation, and serialization of names and ARNs.

use lamsync::types::*;

mod function_name_tests {
    use super::*;

    #[test]
    fn valid_names() {
        assert!(FunctionName::new("orders").is_ok());
        assert!(FunctionName::new("orders-worker_2").is_ok());
        assert!(FunctionName::new(&"x".repeat(64)).is_ok());
    }

    #[test]
    fn invalid_names() {
        assert!(matches!(FunctionName::new(""), Err(FunctionNameError::Empty)));
        assert!(matches!(
            FunctionName::new(&"x".repeat(65)),
            Err(FunctionNameError::TooLong)
        ));
        assert!(matches!(
            FunctionName::new("orders worker"),
            Err(FunctionNameError::InvalidChar(' '))
        ));
    }

    #[test]
    fn serializes_as_plain_string() {
        let name = FunctionName::new("orders").unwrap();
        assert_eq!(serde_json::to_string(&name).unwrap(), r#""orders""#);
    }
}

mod id_tests {
    use super::*;

    #[test]
    fn display_and_as_str_agree() {
        let queue = QueueArn::new("arn:aws:sqs:us-east-1:1:orders");
        assert_eq!(queue.to_string(), queue.as_str());
    }

    #[test]
    fn equal_values_are_equal() {
        assert_eq!(MappingId::new("uuid-1"), MappingId::from("uuid-1"));
        assert_ne!(MappingId::new("uuid-1"), MappingId::new("uuid-2"));
    }

    #[test]
    fn deserializes_from_yaml_string() {
        let role: RoleArn = serde_yaml::from_str("arn:aws:iam::1:role/orders").unwrap();
        assert_eq!(role.as_str(), "arn:aws:iam::1:role/orders");
    }

    #[test]
    fn empty_identifier_is_rejected() {
        assert!(serde_yaml::from_str::<LayerArn>("''").is_err());
    }
}
