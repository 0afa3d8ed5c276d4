use crate::models::stock::ItemStatus;

/// Derive an allocation's status from its items' statuses.
///
/// Precedence: all accepted, all rejected, any reviewed, otherwise pending.
/// A single reviewed item among pending ones already yields
/// `PartiallyAccepted`.
pub fn aggregate<I>(statuses: I) -> ItemStatus
where
    I: IntoIterator<Item = ItemStatus>,
{
    let statuses: Vec<ItemStatus> = statuses.into_iter().collect();

    if statuses.iter().all(|s| *s == ItemStatus::Accepted) {
        ItemStatus::Accepted
    } else if statuses.iter().all(|s| *s == ItemStatus::Rejected) {
        ItemStatus::Rejected
    } else if statuses.iter().any(|s| *s != ItemStatus::Pending) {
        ItemStatus::PartiallyAccepted
    } else {
        ItemStatus::Pending
    }
}
