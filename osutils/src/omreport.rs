use std::{
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{Context, Error};
use log::debug;

use raidtree_api::constants::OMREPORT_PATH_DEFAULT;

use crate::exe::RunAndCheck;

/// Wrapper around the storage inventory command. Every query returns the raw
/// XML document the command prints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OmReport {
    path: PathBuf,
}

impl Default for OmReport {
    fn default() -> Self {
        Self::new(OMREPORT_PATH_DEFAULT)
    }
}

impl OmReport {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Lists every controller.
    pub fn controllers(&self) -> Result<String, Error> {
        debug!("Querying controllers");
        self.query(&["controller"])
            .context("Failed to query controllers")
    }

    /// Lists the virtual disks of one controller.
    pub fn virtual_disks(&self, controller: u32) -> Result<String, Error> {
        debug!("Querying virtual disks of controller {controller}");
        self.query(&["vdisk", &format!("controller={controller}")])
            .with_context(|| format!("Failed to query virtual disks of controller {controller}"))
    }

    /// Lists the array disks of one controller.
    pub fn array_disks(&self, controller: u32) -> Result<String, Error> {
        debug!("Querying array disks of controller {controller}");
        self.query(&["pdisk", &format!("controller={controller}")])
            .with_context(|| format!("Failed to query array disks of controller {controller}"))
    }

    /// Lists the array disks assigned to one virtual disk.
    pub fn assigned_disks(&self, controller: u32, vdisk: u32) -> Result<String, Error> {
        debug!("Querying disks assigned to virtual disk {controller}:{vdisk}");
        self.query(&[
            "pdisk",
            &format!("controller={controller}"),
            &format!("vdisk={vdisk}"),
        ])
        .with_context(|| {
            format!("Failed to query disks assigned to virtual disk {controller}:{vdisk}")
        })
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(&self.path);
        command.arg("storage").args(args).arg("-fmt").arg("xml");
        command
    }

    fn query(&self, args: &[&str]) -> Result<String, Error> {
        self.command(args).output_and_check()
    }
}
