use std::fmt;

macro_rules! error_codes {
    ($($(#[$meta:meta])* $variant:ident = $code:literal => $name:literal,)+) => {
        /// Five-digit application error code. `code / 100` is the HTTP status.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ErrorCode {
            $($(#[$meta])* $variant,)+
        }

        impl ErrorCode {
            /// Every known code, in ascending numeric order.
            pub const ALL: &'static [ErrorCode] = &[$(ErrorCode::$variant,)+];

            pub fn code(self) -> u32 {
                match self {
                    $(ErrorCode::$variant => $code,)+
                }
            }

            /// Upper-snake name, e.g. `INVALID_PARAMS`.
            pub fn name(self) -> &'static str {
                match self {
                    $(ErrorCode::$variant => $name,)+
                }
            }

            pub fn from_code(code: u32) -> Option<Self> {
                match code {
                    $($code => Some(ErrorCode::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

error_codes! {
    // 400xx
    InvalidParams = 40001 => "INVALID_PARAMS",
    // 401xx
    Unauthorized = 40100 => "UNAUTHORIZED",
    SessionMismatch = 40101 => "SESSION_MISMATCH",
    SessionExpired = 40102 => "SESSION_EXPIRED",
    InvalidToken = 40103 => "INVALID_TOKEN",
    ExpiredToken = 40104 => "EXPIRED_TOKEN",
    InvalidSignature = 40105 => "INVALID_SIGNATURE",
    // 403xx
    InsufficientPermissions = 40301 => "INSUFFICIENT_PERMISSIONS",
    ComingSoon = 40302 => "COMING_SOON",
    SystemMaintenance = 40303 => "SYSTEM_MAINTENANCE",
    BlacklistUser = 40304 => "BLACKLIST_USER",
    WithdrawalRestriction = 40305 => "WITHDRAWAL_RESTRICTION",
    // 404xx
    NotFound = 40401 => "NOT_FOUND",
    // 409xx
    AlreadyExisted = 40901 => "ALREADY_EXISTED",
    /// Not enough balance, stock, or quota.
    Insufficient = 40902 => "INSUFFICIENT",
    NotSupport = 40903 => "NOT_SUPPORT",
    ManyRequests = 40904 => "MANY_REQUESTS",
    // 5xxxx
    InternalServerError = 50001 => "INTERNAL_SERVER_ERROR",
    NotImplemented = 50101 => "NOT_IMPLEMENTED",
    BadGateway = 50201 => "BAD_GATEWAY",
    ServiceUnavailable = 50301 => "SERVICE_UNAVAILABLE",
}

impl ErrorCode {
    /// Default HTTP status for this code.
    pub fn status(self) -> u16 {
        // Every code is five digits, so the quotient always fits.
        (self.code() / 100) as u16
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}
