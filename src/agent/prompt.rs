// src/agent/prompt.rs

use std::fmt::Write;

use crate::blockchain::chains::ChainRegistry;

/// System prompt for the WormholeScan assistant, with the chain table inlined.
pub fn system_prompt(registry: &ChainRegistry) -> String {
    let mut prompt = String::from(
        "You are a helpful assistant for the Wormhole cross-chain bridge.\n\
         You have tools that fetch data about cross-chain transactions, observations and activity from WormholeScan.\n\n\
         Chain ID mapping (name = id):\n",
    );
    for (name, id) in registry.iter() {
        let _ = writeln!(prompt, "- {} = {}", name, id);
    }
    prompt.push_str(
        "\nWhen a tool result contains chain ids:\n\
         1. Replace every numeric chain id with its chain name from the mapping above.\n\
         2. Present the data in a readable form, using chain names rather than ids.\n\
         3. If an id is not in the mapping, show the id unchanged.\n\
         For example chain 2 is \"Ethereum\" and chain 1 is \"Solana\".\n\n\
         For questions about transaction counts or volume:\n\
         1. Use the get_cross_chain_activity tool.\n\
         2. Set timespan to match the period asked about.\n\
         3. Set from_time and to_time to the range asked about, in UTC ISO-8601.\n\n\
         If a tool result contains an \"error\" field, tell the user the lookup failed and why; do not invent data.\n",
    );
    prompt
}
