use crate::{
    schema::{ModelKind, Schema, Type},
    value::{Value, ValueMap, ValueRecord},
    Error, Result,
};

/// Serializes a validated value of type `ty` as JSON. Record fields emit in
/// declaration order.
pub(super) fn to_json(schema: &Schema, ty: &Type, value: &Value) -> serde_json::Value {
    use serde_json::Value as Json;

    match value {
        Value::Null => Json::Null,
        Value::Bool(v) => Json::Bool(*v),
        Value::I64(v) => Json::Number((*v).into()),
        Value::F64(v) => serde_json::Number::from_f64(*v)
            .map(Json::Number)
            .unwrap_or(Json::Null),
        Value::String(v) => Json::String(v.clone()),
        Value::List(items) => {
            let item_ty = ty.unwrap_list_ref();
            Json::Array(
                items
                    .iter()
                    .map(|item| to_json(schema, item_ty, item))
                    .collect(),
            )
        }
        Value::Map(map) => {
            let value_ty = match ty {
                Type::Map(value_ty) => value_ty,
                _ => panic!("expected Type::Map; actual={ty:#?}"),
            };
            Json::Object(
                map.iter()
                    .map(|(key, item)| (key.clone(), to_json(schema, value_ty, item)))
                    .collect(),
            )
        }
        Value::Record(record) => {
            let model = match ty {
                Type::Model(id) => schema.model(*id),
                _ => panic!("expected Type::Model; actual={ty:#?}"),
            };
            Json::Object(
                model
                    .fields
                    .iter()
                    .zip(record.iter())
                    .map(|(field, item)| {
                        (field.name.clone(), to_json(schema, &field.ty, item))
                    })
                    .collect(),
            )
        }
    }
}

/// Parses JSON into a value of type `ty`, validating as it goes.
///
/// Only types the schema declares are ever constructed. Failures name the
/// offending path.
pub(super) fn from_json(
    schema: &Schema,
    ty: &Type,
    json: &serde_json::Value,
    path: &str,
) -> Result<Value> {
    use serde_json::Value as Json;

    match ty {
        Type::Bool => match json {
            Json::Bool(v) => Ok(Value::Bool(*v)),
            other => Err(mismatch(path, "Bool", other)),
        },
        Type::I64 => match json {
            Json::Number(n) => n
                .as_i64()
                .map(Value::I64)
                .ok_or_else(|| mismatch(path, "I64", json)),
            other => Err(mismatch(path, "I64", other)),
        },
        Type::F64 => match json {
            Json::Number(n) => n
                .as_f64()
                .map(Value::F64)
                .ok_or_else(|| mismatch(path, "F64", json)),
            other => Err(mismatch(path, "F64", other)),
        },
        Type::String => match json {
            Json::String(v) => Ok(Value::String(v.clone())),
            other => Err(mismatch(path, "String", other)),
        },
        Type::List(item_ty) => match json {
            Json::Array(items) => {
                let items = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        from_json(schema, item_ty, item, &format!("{path}[{i}]"))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::List(items))
            }
            other => Err(mismatch(path, "List", other)),
        },
        Type::Map(value_ty) => match json {
            Json::Object(entries) => {
                let mut map = ValueMap::new();
                for (key, item) in entries {
                    let item = from_json(schema, value_ty, item, &format!("{path}.{key}"))?;
                    map.insert(key.clone(), item);
                }
                Ok(Value::Map(map))
            }
            other => Err(mismatch(path, "Map", other)),
        },
        Type::Model(id) => {
            let model = schema.model(*id);
            match &model.kind {
                ModelKind::Root(root_ty) => from_json(schema, root_ty, json, path),
                ModelKind::Record => {
                    let Json::Object(entries) = json else {
                        return Err(mismatch(path, &model.name, json));
                    };

                    for key in entries.keys() {
                        if model.field_by_name(key).is_none() {
                            return Err(Error::decode(format!(
                                "{path}: unknown field `{key}` for model {}",
                                model.name
                            )));
                        }
                    }

                    let fields = model
                        .fields
                        .iter()
                        .map(|field| {
                            let field_path = format!("{path}.{}", field.name);
                            match entries.get(&field.name) {
                                Some(Json::Null) | None if field.nullable => Ok(Value::Null),
                                Some(item) => from_json(schema, &field.ty, item, &field_path),
                                None => Err(Error::decode(format!(
                                    "{field_path}: missing required field"
                                ))),
                            }
                        })
                        .collect::<Result<Vec<_>>>()?;

                    Ok(Value::Record(ValueRecord::from_vec(fields)))
                }
            }
        }
        Type::Null | Type::Unknown => Err(Error::decode(format!(
            "{path}: schema declares undecodable type {ty:?}"
        ))),
    }
}

fn mismatch(path: &str, expected: &str, found: &serde_json::Value) -> Error {
    let found = match found {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    };
    Error::decode(format!("{path}: expected {expected}, found {found}"))
}
