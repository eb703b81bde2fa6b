//! # 画面ルートと認可ガード
//!
//! | パス | 認証 |
//! |------|------|
//! | `/login` | 不要 |
//! | `/dashboard` | 必要 |
//! | `/students` | 必要 |
//! | `/` | `/dashboard` へリダイレクト |

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::session::Session;

/// 画面ルート
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
pub enum Route {
    #[strum(serialize = "/")]
    Root,
    #[strum(serialize = "/login")]
    Login,
    #[strum(serialize = "/dashboard")]
    Dashboard,
    #[strum(serialize = "/students")]
    Students,
}

impl Route {
    pub fn path(self) -> &'static str {
        self.into()
    }

    /// 認証が必要か
    pub fn is_protected(self) -> bool {
        matches!(self, Route::Dashboard | Route::Students)
    }
}

/// ガードの判定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Proceed,
    Redirect(Route),
}

/// ルートへの遷移可否を判定する
pub fn authorize(session: &Session, route: Route) -> RouteDecision {
    match route {
        Route::Root => RouteDecision::Redirect(Route::Dashboard),
        route if !route.is_protected() || session.is_authenticated() => RouteDecision::Proceed,
        _ => RouteDecision::Redirect(Route::Login),
    }
}
