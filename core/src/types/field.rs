use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// User-editable record fields.
///
/// `id` and `fechaDelDia` are deliberately absent: neither can be set through
/// a draft, which is what makes them immutable after creation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    #[default]
    Apellido,
    Nombre,
    Telefono,
    Producto,
    CodigoProducto,
    FechaCompra,
    Observaciones,
    Estado,
}

#[derive(Debug, Error)]
#[error("unknown field: {0}")]
pub struct UnknownField(pub String);

impl FieldName {
    pub const ALL: [FieldName; 8] = [
        FieldName::Apellido,
        FieldName::Nombre,
        FieldName::Telefono,
        FieldName::Producto,
        FieldName::CodigoProducto,
        FieldName::FechaCompra,
        FieldName::Observaciones,
        FieldName::Estado,
    ];

    /// Fields offered by the filter dropdown in the console.
    pub const FILTERABLE: [FieldName; 6] = [
        FieldName::Apellido,
        FieldName::Nombre,
        FieldName::Telefono,
        FieldName::Producto,
        FieldName::CodigoProducto,
        FieldName::Estado,
    ];

    /// Wire name, matching the original JSON keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Apellido => "apellido",
            FieldName::Nombre => "nombre",
            FieldName::Telefono => "telefono",
            FieldName::Producto => "producto",
            FieldName::CodigoProducto => "codigoProducto",
            FieldName::FechaCompra => "fechaCompra",
            FieldName::Observaciones => "observaciones",
            FieldName::Estado => "estado",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldName::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}
