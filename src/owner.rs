/*!
 * Owner and group name resolution
 */

use serde_json::{json, Value};

use crate::utils::decode_os;

/// Maps numeric user and group ids to names.
///
/// Implementations return `None` for any failed lookup: unknown ids and
/// unavailable identity services are treated alike.
pub trait NameResolver: Send + Sync {
    fn user_name(&self, uid: u32) -> Option<String>;
    fn group_name(&self, gid: u32) -> Option<String>;
}

/// Resolver backed by the host's passwd and group databases
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemNames;

impl NameResolver for SystemNames {
    fn user_name(&self, uid: u32) -> Option<String> {
        users::get_user_by_uid(uid).map(|user| decode_os(user.name()))
    }

    fn group_name(&self, gid: u32) -> Option<String> {
        users::get_group_by_gid(gid).map(|group| decode_os(group.name()))
    }
}

/// `{uid, name}` with a null name when the id does not resolve
pub fn resolve_user(resolver: &dyn NameResolver, uid: u32) -> Value {
    json!({ "uid": uid, "name": resolver.user_name(uid) })
}

/// `{gid, name}` with a null name when the id does not resolve
pub fn resolve_group(resolver: &dyn NameResolver, gid: u32) -> Value {
    json!({ "gid": gid, "name": resolver.group_name(gid) })
}
