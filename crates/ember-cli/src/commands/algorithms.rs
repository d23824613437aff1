//! Algorithm listing command.

use clap::Args;
use ember_core::Algorithm;

#[derive(Args)]
pub struct AlgorithmsArgs {
    /// Also show which algorithms use ADAA and sag
    #[arg(long)]
    verbose: bool,
}

pub fn run(args: &AlgorithmsArgs) -> anyhow::Result<()> {
    println!("{:>5}  {:12}  {:14}", "Index", "Id", "Name");
    println!("{:>5}  {:12}  {:14}", "-----", "--", "----");

    for algorithm in Algorithm::ALL {
        print!(
            "{:>5}  {:12}  {:14}",
            algorithm.index(),
            algorithm.id(),
            algorithm.name()
        );
        if args.verbose {
            let shaper = algorithm.shaper();
            print!(
                "  adaa={:<5}  sag={:<5}  makeup={:.2}",
                shaper.uses_adaa(),
                shaper.uses_sag,
                shaper.makeup_gain
            );
        }
        println!();
    }

    println!();
    println!("Use the id with `ember process --algorithm <ID>`.");
    Ok(())
}
