use crate::types::FieldName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// Identifier assigned at creation, derived from the creation timestamp in
/// milliseconds. Unique within a collection and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    pub(crate) fn from_timestamp(now: SystemTime) -> Self {
        let millis = now
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self(millis)
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for RecordId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Warranty lifecycle status. Closed set; wire strings match the console
/// labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Estado {
    #[default]
    Activa,
    Expirada,
    #[serde(rename = "En revisión")]
    EnRevision,
}

#[derive(Debug, Error)]
#[error("unknown estado: {0}")]
pub struct UnknownEstado(pub String);

impl Estado {
    pub const ALL: [Estado; 3] = [Estado::Activa, Estado::Expirada, Estado::EnRevision];

    pub fn as_str(&self) -> &'static str {
        match self {
            Estado::Activa => "Activa",
            Estado::Expirada => "Expirada",
            Estado::EnRevision => "En revisión",
        }
    }
}

impl fmt::Display for Estado {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Estado {
    type Err = UnknownEstado;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Estado::ALL
            .iter()
            .copied()
            .find(|estado| estado.as_str() == s)
            .ok_or_else(|| UnknownEstado(s.to_string()))
    }
}

const FECHA_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// `YYYY-MM-DD` for the given instant, UTC.
pub(crate) fn fecha(now: SystemTime) -> String {
    OffsetDateTime::from(now)
        .date()
        .format(FECHA_FORMAT)
        .expect("date formatting failed")
}

/// One warranty entry ("garantía") in the collection.
///
/// JSON keys are camelCase, matching the persisted blob format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    pub apellido: String,
    pub nombre: String,
    pub telefono: String,
    pub producto: String,
    pub codigo_producto: String,
    pub fecha_compra: String,
    /// Registration date, set when the record is created. Never user-edited.
    pub fecha_del_dia: String,
    #[serde(default)]
    pub observaciones: String,
    #[serde(default)]
    pub estado: Estado,
}

impl Record {
    /// Stringified value of a field, as displayed and filtered.
    pub fn field(&self, name: FieldName) -> &str {
        match name {
            FieldName::Apellido => &self.apellido,
            FieldName::Nombre => &self.nombre,
            FieldName::Telefono => &self.telefono,
            FieldName::Producto => &self.producto,
            FieldName::CodigoProducto => &self.codigo_producto,
            FieldName::FechaCompra => &self.fecha_compra,
            FieldName::Observaciones => &self.observaciones,
            FieldName::Estado => self.estado.as_str(),
        }
    }

    fn set_field(&mut self, name: FieldName, value: String) {
        match name {
            FieldName::Apellido => self.apellido = value,
            FieldName::Nombre => self.nombre = value,
            FieldName::Telefono => self.telefono = value,
            FieldName::Producto => self.producto = value,
            FieldName::CodigoProducto => self.codigo_producto = value,
            FieldName::FechaCompra => self.fecha_compra = value,
            FieldName::Observaciones => self.observaciones = value,
            // estado is typed and only set through Draft::set.
            FieldName::Estado => {}
        }
    }
}

/// Transient, uncommitted field set for a record being created or edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    fields: BTreeMap<FieldName, String>,
    estado: Option<Estado>,
}

impl Draft {
    /// Fields that must be non-empty for `add` to succeed.
    pub const REQUIRED: [FieldName; 6] = [
        FieldName::Apellido,
        FieldName::Nombre,
        FieldName::Telefono,
        FieldName::Producto,
        FieldName::CodigoProducto,
        FieldName::FechaCompra,
    ];

    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_record(record: &Record) -> Self {
        let mut fields = BTreeMap::new();
        for name in FieldName::ALL {
            if name == FieldName::Estado {
                continue;
            }
            fields.insert(name, record.field(name).to_string());
        }
        Self {
            fields,
            estado: Some(record.estado),
        }
    }

    /// Merges one field into the draft.
    ///
    /// Every field except `estado` is uppercased before storage; the cased
    /// value is what gets persisted and filtered.
    pub fn set(&mut self, name: FieldName, value: &str) -> Result<(), UnknownEstado> {
        match name {
            FieldName::Estado => {
                self.estado = Some(value.parse()?);
            }
            _ => {
                self.fields.insert(name, value.to_uppercase());
            }
        }
        Ok(())
    }

    pub fn get(&self, name: FieldName) -> Option<&str> {
        match name {
            FieldName::Estado => self.estado.as_ref().map(Estado::as_str),
            _ => self.fields.get(&name).map(String::as_str),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.estado.is_none()
    }

    pub(crate) fn missing_required(&self) -> bool {
        Self::REQUIRED
            .iter()
            .any(|name| self.fields.get(name).is_none_or(|v| v.is_empty()))
    }

    /// Shallow merge: fields absent from the draft keep their previous value.
    pub(crate) fn apply_to(&self, record: &mut Record) {
        for (&name, value) in &self.fields {
            record.set_field(name, value.clone());
        }
        if let Some(estado) = self.estado {
            record.estado = estado;
        }
    }

    pub(crate) fn into_record(mut self, id: RecordId, now: SystemTime) -> Record {
        let estado = self.estado.unwrap_or_default();
        let mut take = |name| self.fields.remove(&name).unwrap_or_default();
        Record {
            id,
            apellido: take(FieldName::Apellido),
            nombre: take(FieldName::Nombre),
            telefono: take(FieldName::Telefono),
            producto: take(FieldName::Producto),
            codigo_producto: take(FieldName::CodigoProducto),
            fecha_compra: take(FieldName::FechaCompra),
            fecha_del_dia: fecha(now),
            observaciones: take(FieldName::Observaciones),
            estado,
        }
    }
}
