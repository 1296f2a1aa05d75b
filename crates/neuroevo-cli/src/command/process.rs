use std::path::PathBuf;

use anyhow::Context;

use crate::util::{self, Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ProcessArg {
    /// Controller file to run
    controller: PathBuf,
    /// Input values, one per input neuron
    #[arg(allow_negative_numbers = true)]
    inputs: Vec<f32>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ProcessArg) -> anyhow::Result<()> {
    let ProcessArg {
        controller,
        inputs,
        output,
    } = arg;
    let controller = util::read_controller_file(controller)?;
    let outputs = controller
        .network
        .try_process(inputs)
        .context("Failed to run controller")?;
    Output::save_json(&outputs, output.clone())
}
