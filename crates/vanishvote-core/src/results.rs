use vanishvote_models::PollOption;

pub fn total_votes(options: &[PollOption]) -> u64 {
    options.iter().map(|o| o.votes).sum()
}

/// Share of `votes` in `total` as a whole percentage, halves rounded up.
/// Zero when nobody has voted yet.
pub fn percentage(votes: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let votes = u128::from(votes.min(total));
    let total = u128::from(total);
    ((votes * 200 + total) / (total * 2)) as u8
}

/// Per-option percentages in option order.
pub fn shares(options: &[PollOption]) -> Vec<u8> {
    let total = total_votes(options);
    options.iter().map(|o| percentage(o.votes, total)).collect()
}
