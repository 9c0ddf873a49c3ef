use crate::domain::model::View;
use crate::domain::ports::Navigator;

/// 首頁按鈕：預約類導向登入頁，說明類導向關於頁
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeAction {
    BookNow,
    LearnMore,
    BackHome,
}

impl HomeAction {
    pub fn target(&self) -> View {
        match self {
            HomeAction::BookNow => View::Login,
            HomeAction::LearnMore => View::About,
            HomeAction::BackHome => View::Home,
        }
    }

    pub fn trigger(&self, navigator: &dyn Navigator) {
        tracing::debug!("Home action {:?}", self);
        navigator.navigate(self.target());
    }
}

pub fn book_now(navigator: &dyn Navigator) {
    HomeAction::BookNow.trigger(navigator);
}

pub fn learn_more(navigator: &dyn Navigator) {
    HomeAction::LearnMore.trigger(navigator);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::navigation::HistoryNavigator;

    #[test]
    fn test_buttons_navigate_immediately() {
        let nav = HistoryNavigator::new();

        book_now(&nav);
        assert_eq!(nav.current(), Some(View::Login));

        learn_more(&nav);
        assert_eq!(nav.current(), Some(View::About));

        HomeAction::BackHome.trigger(&nav);
        assert_eq!(nav.history(), vec![View::Login, View::About, View::Home]);
        assert_eq!(nav.current().map(|v| v.page()), Some("index.html"));
    }
}
