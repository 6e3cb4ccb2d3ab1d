/// Edge state after a follow operation
///
/// Edges are directed: `follower_id` observes `followed_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowState {
    Following,
    NotFollowing,
}
