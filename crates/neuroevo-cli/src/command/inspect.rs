use std::path::PathBuf;

use crate::util;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct InspectArg {
    /// Controller file to inspect
    controller: PathBuf,
}

pub(crate) fn run(arg: &InspectArg) -> anyhow::Result<()> {
    let controller = util::read_controller_file(&arg.controller)?;
    println!("Role:       {}", controller.role);
    println!("Generation: {}", controller.generation);
    println!("Fitness:    {:.3}", controller.fitness);
    println!("Trained at: {}", controller.trained_at);
    println!("Topology:   {}", controller.network.topology());
    println!();
    print!("{}", controller.network);
    Ok(())
}
