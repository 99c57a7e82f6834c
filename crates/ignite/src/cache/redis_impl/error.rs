//! Redis error mapping to CacheError.

use ignite_core::cache::CacheError;

/// Maps Redis errors to CacheError.
pub fn map_redis_error(err: redis::RedisError) -> CacheError {
    if err.is_connection_refusal() || err.is_timeout() || err.is_connection_dropped() {
        CacheError::ConnectionFailed(err.to_string())
    } else {
        CacheError::OperationFailed(err.to_string())
    }
}

/// Maps a failure to check a connection out of the pool.
pub fn map_pool_error(err: deadpool_redis::PoolError) -> CacheError {
    match err {
        deadpool_redis::PoolError::Backend(err) => map_redis_error(err),
        other => CacheError::ConnectionFailed(other.to_string()),
    }
}
