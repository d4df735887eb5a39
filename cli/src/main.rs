//! Terminal admin console over `garantia_core`.
//!
//! Pure presentation: renders what the stores return and owns the
//! destructive-action confirmation for `borrar`. All business validation
//! lives in the core.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use garantia_core::types::{AppConfig, Config, Draft, FieldName, RecordId};
use garantia_core::{AccountStore, FilterQuery, RecordStore};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::SystemTime;

#[derive(Parser)]
#[command(name = "garantia", about = "Consola de administración de garantías")]
struct Cli {
    /// Data directory holding the persisted slots.
    #[arg(long, default_value = "garantia-data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a warranty record.
    Agregar {
        #[arg(long)]
        apellido: String,
        #[arg(long)]
        nombre: String,
        #[arg(long)]
        telefono: String,
        #[arg(long)]
        producto: String,
        #[arg(long)]
        codigo: String,
        #[arg(long)]
        fecha_compra: String,
        #[arg(long, default_value = "")]
        observaciones: String,
        /// Activa, Expirada or "En revisión". Defaults to Activa.
        #[arg(long)]
        estado: Option<String>,
    },
    /// List every record.
    Listar,
    /// Filter records by one field (case-insensitive substring).
    Filtrar {
        /// apellido, nombre, telefono, producto, codigoProducto or estado.
        /// Defaults to the configured filter field.
        #[arg(long)]
        campo: Option<String>,
        texto: String,
    },
    /// Edit one field of a record.
    Editar {
        id: u64,
        campo: String,
        valor: String,
    },
    /// Delete a record. Asks for confirmation unless --si is given.
    Borrar {
        id: u64,
        #[arg(long)]
        si: bool,
    },
    /// Create a console user.
    CrearUsuario { nickname: String, password: String },
    /// Check a login against the user store.
    Login { nickname: String, password: String },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config {
        base_path: cli.data_dir.clone(),
    };
    let app_config = AppConfig::load(&AppConfig::path(&cli.data_dir))?;

    match cli.command {
        Command::Agregar {
            apellido,
            nombre,
            telefono,
            producto,
            codigo,
            fecha_compra,
            observaciones,
            estado,
        } => {
            let mut store = RecordStore::open_in(&config);
            let mut draft = Draft::new();
            draft.set(FieldName::Apellido, &apellido)?;
            draft.set(FieldName::Nombre, &nombre)?;
            draft.set(FieldName::Telefono, &telefono)?;
            draft.set(FieldName::Producto, &producto)?;
            draft.set(FieldName::CodigoProducto, &codigo)?;
            draft.set(FieldName::FechaCompra, &fecha_compra)?;
            draft.set(FieldName::Observaciones, &observaciones)?;
            if let Some(estado) = estado {
                draft.set(FieldName::Estado, &estado)?;
            }

            let record = store.add(draft, SystemTime::now())?;
            println!("Garantía {} registrada ({})", record.id, record.fecha_del_dia);
        }
        Command::Listar => {
            let store = RecordStore::open_in(&config);
            print_rows(store.records().iter());
        }
        Command::Filtrar { campo, texto } => {
            let store = RecordStore::open_in(&config);
            let field = match campo {
                Some(campo) => campo.parse()?,
                None => app_config.campo_filtro,
            };
            let query = FilterQuery::new(field, texto);
            print_rows(store.filter(&query));
        }
        Command::Editar { id, campo, valor } => {
            let mut store = RecordStore::open_in(&config);
            let field: FieldName = campo.parse()?;

            store.begin_edit(RecordId::from(id))?;
            store.update_draft_field(field, &valor)?;
            let record = store.commit_edit()?;
            println!("Garantía {} actualizada", record.id);
        }
        Command::Borrar { id, si } => {
            let mut store = RecordStore::open_in(&config);
            let id = RecordId::from(id);
            let Some(record) = store.get(id) else {
                bail!("record not found: {id}");
            };

            let skip_prompt = si || !app_config.confirmar_borrado;
            if !skip_prompt && !confirm(&format!("¿Eliminar la garantía de {}?", record.apellido))?
            {
                println!("Cancelado");
                return Ok(());
            }

            store.remove(id)?;
            println!("Garantía {id} eliminada");
        }
        Command::CrearUsuario { nickname, password } => {
            let mut store = AccountStore::open_in(&config);
            let account = store.add(&nickname, &password)?;
            println!("Usuario {} creado", account.nickname);
        }
        Command::Login { nickname, password } => {
            let store = AccountStore::open_in(&config);
            if store.verify(&nickname, &password) {
                println!("Bienvenido, {}", nickname.trim());
            } else {
                bail!("usuario o contraseña incorrectos");
            }
        }
    }

    Ok(())
}

fn print_rows<'a>(rows: impl Iterator<Item = &'a garantia_core::types::Record>) {
    let mut any = false;
    for record in rows {
        any = true;
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            record.id,
            record.apellido,
            record.nombre,
            record.telefono,
            record.producto,
            record.codigo_producto,
            record.fecha_compra,
            record.fecha_del_dia,
            record.estado,
            record.observaciones,
        );
    }
    if !any {
        println!("(sin resultados)");
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [s/N] ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "s" | "S" | "si" | "sí"))
}
