//! Identity contract for records held by the client record store.

/// A record addressable by an opaque string id.
///
/// An empty id means the record has not been assigned one yet; the record
/// store fills it in on insertion.
pub trait StoreRecord: Clone {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);

    fn has_id(&self) -> bool {
        !self.id().is_empty()
    }
}
