#![allow(clippy::too_many_arguments, clippy::result_large_err)]
#![deny(
  clippy::cast_lossless,
  clippy::cast_possible_truncation,
  clippy::cast_possible_wrap,
  clippy::cast_sign_loss
)]

use {
  self::{
    arguments::Arguments,
    config::Config,
    options::Options,
    subcommand::{Output, Subcommand, SubcommandResult},
  },
  anyhow::{anyhow, bail, Context, Error},
  clap::Parser,
  serde::{Deserialize, Deserializer, Serialize, Serializer},
  std::{
    env,
    fmt::{self, Display, Formatter},
    io,
    path::{Path, PathBuf},
    process,
    str::FromStr,
    sync::atomic::{self, AtomicBool},
  },
};

pub use crate::{inscription_id::InscriptionId, sequence::Sequence};

mod arguments;
pub mod config;
pub mod datastore;
pub mod index;
pub mod inscription_id;
mod logger;
mod options;
pub mod protocol;
mod sequence;
mod subcommand;

type Result<T = (), E = Error> = std::result::Result<T, E>;

/// Raised by the `Ctrl-C` handler; long running subcommands poll it between
/// blocks and the reorg unwind treats it as a cancellation request.
pub static SHUTTING_DOWN: AtomicBool = AtomicBool::new(false);

pub fn main() {
  let args = Arguments::parse();

  ctrlc::set_handler(move || {
    if SHUTTING_DOWN.swap(true, atomic::Ordering::Relaxed) {
      process::exit(1);
    }

    eprintln!("Shutting down gracefully. Press <CTRL-C> again to shutdown immediately.");
  })
  .expect("Error setting <CTRL-C> handler");

  match args.run() {
    Err(err) => {
      eprintln!("error: {err}");
      err
        .chain()
        .skip(1)
        .for_each(|cause| eprintln!("because: {cause}"));
      if env::var_os("RUST_BACKTRACE")
        .map(|val| val == "1")
        .unwrap_or_default()
      {
        eprintln!("{}", err.backtrace());
      }

      process::exit(1);
    }
    Ok(output) => output.print_json(),
  }
}
