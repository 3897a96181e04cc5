mod merge_tests;

use serde_json::{Value, json};

/// Schema export with one provider exercising every node kind.
pub(crate) fn widget_export() -> Value {
    json!({
        "format_version": "1.0",
        "provider_schemas": {
            "registry.terraform.io/acme/demo": {
                "provider": {
                    "version": 0,
                    "block": {
                        "attributes": {
                            "region": {"type": "string", "description": "Region to manage.", "optional": true}
                        }
                    }
                },
                "resource_schemas": {
                    "demo_widget": {
                        "version": 2,
                        "block": {
                            "description": "A widget.",
                            "attributes": {
                                "id": {"type": "string", "computed": true},
                                "size": {"type": "string", "optional": true},
                                "labels": {"type": ["map", "string"], "optional": true},
                                "token": {"type": "string", "sensitive": true, "optional": true, "deprecated": true},
                                "rules": {
                                    "nested_type": {"nesting_mode": "list", "attributes": {}},
                                    "optional": true
                                }
                            },
                            "block_types": {
                                "mount": {
                                    "nesting_mode": "list",
                                    "min_items": 0,
                                    "max_items": 2,
                                    "block": {
                                        "description": "Mount point.",
                                        "attributes": {
                                            "path": {"type": "string", "required": true}
                                        },
                                        "block_types": {
                                            "options": {
                                                "nesting_mode": "single",
                                                "description": "Mount options.",
                                                "block": {
                                                    "attributes": {"read_only": {"type": "bool", "optional": true}}
                                                }
                                            }
                                        }
                                    }
                                },
                                "timeouts": {
                                    "nesting_mode": "single",
                                    "block": {"attributes": {"create": {"type": "string", "optional": true}}}
                                }
                            }
                        }
                    }
                },
                "data_source_schemas": {
                    "demo_widget": {
                        "version": 0,
                        "block": {
                            "attributes": {"id": {"type": "string", "required": true}}
                        }
                    }
                },
                "ephemeral_resource_schemas": {
                    "demo_token": {
                        "version": 0,
                        "block": {
                            "deprecated": true,
                            "attributes": {"value": {"type": "string", "computed": true, "sensitive": true}}
                        }
                    }
                },
                "functions": {
                    "parse_id": {"return_type": "string"}
                }
            }
        }
    })
}
