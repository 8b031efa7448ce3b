use anyhow::Result;

use crate::cli::DescribeCommand;
use crate::util::resolve_rule;

pub fn describe_rule(command: DescribeCommand) -> Result<()> {
    let rule = resolve_rule(&command.rule)?;
    println!("{}", rule);
    println!("{}", rule.to_json()?);
    Ok(())
}
