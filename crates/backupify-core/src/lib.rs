// backupify Core Library (russh 기반)
// author: kodeholic

pub mod backup;
pub mod config;
pub mod error;
pub mod session;
pub mod sftp;
pub mod state;
pub mod sync;
pub mod utils;

#[cfg(test)]
mod testing;
