//! Parameter declarations to typed operation parameters.

use proto_oas_core::descriptor::{parameter_type, ParameterRule};

use crate::document::{Parameter, ParameterLocation, Schema, SchemaRef, SchemaType};
use crate::error::{Error, Result};
use crate::schema::apply_rules;

/// The four per-location declaration lists of a service or method rule.
pub(crate) struct Declarations<'a> {
    pub path: &'a [ParameterRule],
    pub query: &'a [ParameterRule],
    pub header: &'a [ParameterRule],
    pub cookie: &'a [ParameterRule],
}

/// Resolve a whole declaration set against a path template, in path, query,
/// header, cookie order.
pub(crate) fn resolve_all(
    path_template: &str,
    declarations: &Declarations<'_>,
) -> Result<Vec<Parameter>> {
    let mut parameters = resolve(ParameterLocation::Path, path_template, declarations.path)?;
    parameters.extend(resolve(ParameterLocation::Query, "", declarations.query)?);
    parameters.extend(resolve(ParameterLocation::Header, "", declarations.header)?);
    parameters.extend(resolve(ParameterLocation::Cookie, "", declarations.cookie)?);
    Ok(parameters)
}

/// Resolve one location's declarations. The path template is only consulted
/// for path parameters, which must match a `{name}` placeholder and are
/// always required.
fn resolve(
    location: ParameterLocation,
    path: &str,
    declarations: &[ParameterRule],
) -> Result<Vec<Parameter>> {
    let mut parameters = Vec::with_capacity(declarations.len());

    for declaration in declarations {
        let name = declaration.name.as_deref().unwrap_or("");

        if location == ParameterLocation::Path && !path.contains(&format!("{{{name}}}")) {
            return Err(Error::MissingPathPlaceholder {
                parameter: name.to_string(),
                path: path.to_string(),
            });
        }

        let mut schema = Schema::of_type(schema_type_for(declaration)?);
        if let Some(rules) = declaration.rules.as_ref() {
            apply_rules(&mut schema, rules);
        }

        let required = match location {
            ParameterLocation::Path => true,
            _ => declaration.required.unwrap_or_default(),
        };

        parameters.push(Parameter {
            name: name.to_string(),
            location,
            description: non_blank(declaration.description.as_deref()),
            required,
            example: non_blank(declaration.example.as_deref()),
            schema: SchemaRef::inline(schema),
        });
    }

    Ok(parameters)
}

fn schema_type_for(declaration: &ParameterRule) -> Result<SchemaType> {
    match declaration.r#type.unwrap_or(parameter_type::UNSPECIFIED) {
        parameter_type::UNSPECIFIED | parameter_type::STRING => Ok(SchemaType::String),
        parameter_type::INTEGER => Ok(SchemaType::Integer),
        parameter_type::NUMBER => Ok(SchemaType::Number),
        parameter_type::BOOLEAN => Ok(SchemaType::Boolean),
        value => Err(Error::InvalidParameterType {
            parameter: declaration.name.clone().unwrap_or_default(),
            value,
        }),
    }
}

/// Copied as declared, but only when there is visible content.
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}
