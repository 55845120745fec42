use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::report::{self, Criterion, LimitStatus, Report};
use crate::validate::{self, ValidationError};
use crate::{Account, CommonPasswords, LoginPolicy, Purchase, Session, StoreError, UserStore};

const APP_NAME: &str = "Spending Tracker";
const FRAME_SYMBOL: char = '-';
const FRAME_WIDTH: usize = 70;

/// Prints `lines` between two horizontal rules
pub fn framed<W, I>(out: &mut W, lines: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator,
    I::Item: Display,
{
    let rule = FRAME_SYMBOL.to_string().repeat(FRAME_WIDTH);
    writeln!(out, "{rule}")?;
    for line in lines {
        writeln!(out, "{line}")?;
    }
    writeln!(out, "{rule}")
}

/// Why a menu action ended early
#[derive(Debug)]
enum Interrupt {
    /// The user wants to go back to the previous menu
    Back,
    /// The user wants to quit, or the input ended
    Exit,
    Io(io::Error),
}

impl From<io::Error> for Interrupt {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<csv::Error> for Interrupt {
    fn from(e: csv::Error) -> Self {
        Self::Io(e.into())
    }
}

type Step<T> = Result<T, Interrupt>;

/// Line based input and framed output
struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Reads one trimmed line, an exhausted input exits the program
    fn prompt(&mut self, text: &str) -> Step<String> {
        loop {
            write!(self.output, "{text}")?;
            self.output.flush()?;

            let mut line = Vec::new();
            if self.input.read_until(b'\n', &mut line)? == 0 {
                return Err(Interrupt::Exit);
            }
            match String::from_utf8(line) {
                Ok(line) => return Ok(line.trim().to_string()),
                Err(_) => self.framed(["The input is not valid UTF-8.", "Please try again."])?,
            }
        }
    }

    /// Prompts until `parse` accepts the input
    fn ask<T, E, F>(&mut self, text: &str, mut parse: F) -> Step<T>
    where
        E: Display,
        F: FnMut(&str) -> Result<T, E>,
    {
        loop {
            let line = self.prompt(text)?;
            match parse(&line) {
                Ok(value) => return Ok(value),
                Err(e) => self.framed([e.to_string(), "Please try again.".to_string()])?,
            }
        }
    }

    fn confirm(&mut self, text: &str) -> Step<bool> {
        loop {
            match self.prompt(&format!("{text} [y/n]: "))?.to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.framed(["Please answer with \"y\" or \"n\"."])?,
            }
        }
    }

    /// Shows a numbered menu and returns the chosen option, starting at 1
    fn choose(&mut self, options: &[&str]) -> Step<usize> {
        loop {
            writeln!(self.output)?;
            for (position, description) in options.iter().enumerate() {
                writeln!(self.output, "Enter {} to {description}.", position + 1)?;
            }
            writeln!(self.output, "Enter 0 to exit.")?;
            writeln!(self.output, "Enter \"back\" or \"b\" to navigate back.")?;

            let choice = self.prompt("\nEnter your choice: ")?.to_lowercase();
            match choice.as_str() {
                "back" | "b" => return Err(Interrupt::Back),
                "0" | "quit" | "q" | "exit" | "e" => return Err(Interrupt::Exit),
                _ => {}
            }
            match choice.parse::<usize>() {
                Ok(position) if (1..=options.len()).contains(&position) => return Ok(position),
                _ => self.framed(["Invalid input. Please enter a valid number or command."])?,
            }
        }
    }

    fn framed<I>(&mut self, lines: I) -> io::Result<()>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        framed(&mut self.output, lines)
    }
}

/// The interactive menu of the spending tracker
///
/// The shell owns all state of a running program. Every change to the user
/// data is written back to `data_path` immediately.
pub struct Shell<R, W> {
    console: Console<R, W>,
    store: UserStore,
    session: Session,
    common_passwords: CommonPasswords,
    data_path: PathBuf,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Creates a shell with an empty store and no common passwords
    pub fn new(input: R, output: W, data_path: impl Into<PathBuf>) -> Self {
        Self {
            console: Console { input, output },
            store: UserStore::new(),
            session: Session::default(),
            common_passwords: CommonPasswords::default(),
            data_path: data_path.into(),
        }
    }

    pub fn with_store(mut self, store: UserStore) -> Self {
        self.store = store;
        self
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    pub fn with_common_passwords(mut self, common_passwords: CommonPasswords) -> Self {
        self.common_passwords = common_passwords;
        self
    }

    pub fn store(&self) -> &UserStore {
        &self.store
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Runs the menu until the user exits or the input ends
    pub fn run(&mut self) -> io::Result<()> {
        self.console.framed([format!("|   Welcome to the {APP_NAME}!   |")])?;

        loop {
            let step = match self.session.is_logged_in() {
                false => self.guest_menu(),
                true => self.user_menu(),
            };
            match step {
                Ok(()) | Err(Interrupt::Back) => continue,
                Err(Interrupt::Exit) => break,
                Err(Interrupt::Io(e)) => return Err(e),
            }
        }

        self.session.logout();
        writeln!(self.console.output, "\nThe program has ended.")?;
        self.console.output.flush()
    }

    fn guest_menu(&mut self) -> Step<()> {
        match self.console.choose(&["login", "register"])? {
            1 => self.login(),
            _ => self.register(),
        }
    }

    fn user_menu(&mut self) -> Step<()> {
        let options = [
            "enter a new purchase",
            "generate a full report of your spending",
            "generate a filtered report of your spending",
            "set a custom spending limit",
            "logout",
        ];
        match self.console.choose(&options)? {
            1 => self.enter_purchase(),
            2 => self.full_report(),
            3 => self.filtered_report(),
            4 => self.set_spending_limit(),
            _ => self.logout(),
        }
    }

    fn register(&mut self) -> Step<()> {
        writeln!(self.console.output, "Register new user")?;

        let username = self.console.ask("Please enter your desired username: ", |s| {
            validate::validate_username(s, self.store.usernames())
        })?;
        let password = loop {
            let password = self.console.ask("Please enter your password: ", |s| {
                validate::validate_password(s, &self.common_passwords)
            })?;
            if self.console.prompt("Please enter your password again: ")? == password {
                break password;
            }
            self.console.framed(["The passwords do not match. Please try again."])?;
        };
        let email = self.console.ask("Please enter your e-mail address: ", |s| -> Result<_, ValidationError> {
            let email = validate::validate_email(s)?;
            match self.store.email_in_use(&email) {
                true => Err(ValidationError::DuplicateEmail(email)),
                false => Ok(email),
            }
        })?;
        let phone = self.console.ask(
            "Please enter your phone number in this format: +491234567890 : ",
            validate::validate_phone,
        )?;
        let spending_limit = self.console.ask(
            "Please enter a spending limit in €, 0 for none. You can change it later: ",
            |s| match s.is_empty() {
                true => Ok(0.),
                false => validate::parse_amount("spending limit", s),
            },
        )?;

        let account = match Account::new(password, email, phone, spending_limit) {
            Ok(account) => account,
            Err(e) => return Ok(self.console.framed([e])?),
        };
        if let Err(e) = self.store.add_user(username.as_str(), account) {
            return Ok(self.console.framed([e])?);
        }
        self.save()?;
        self.console
            .framed([format!("Successfully registered new user {username}!")])?;

        Ok(())
    }

    fn login(&mut self) -> Step<()> {
        if self.session.is_logged_in() {
            return Ok(self.console.framed(["You're already logged in"])?);
        }

        let username = self.console.prompt("Please enter your username: ")?;
        let console = &mut self.console;
        let LoginPolicy {
            max_attempts,
            retry_delay,
        } = self.session.policy();
        let max_attempts = max_attempts.max(1);
        let mut asked = 0;
        let mut interrupt = None;

        let mut next_password = || -> Step<String> {
            if asked > 0 {
                let left = max_attempts - asked;
                console.framed([format!("Wrong password, {left} attempt(s) left.")])?;
                if !retry_delay.is_zero() {
                    console.framed([format!(
                        "Wait {} seconds to retry.",
                        retry_delay.as_secs_f64()
                    )])?;
                    std::thread::sleep(retry_delay);
                }
            }
            asked += 1;
            console.prompt("Please enter your password: ")
        };
        let passwords = std::iter::from_fn(|| match next_password() {
            Ok(password) => Some(password),
            Err(e) => {
                interrupt = Some(e);
                None
            }
        });
        let result = self
            .session
            .login(&self.store, &username, passwords)
            .map(str::to_string);

        if let Some(interrupt) = interrupt {
            return Err(interrupt);
        }
        match result {
            Ok(username) => self
                .console
                .framed([format!("Welcome, {username}! Login successful!")])?,
            Err(e) if asked >= max_attempts => self
                .console
                .framed([e.to_string(), "Too many unsuccessful login attempts.".to_string()])?,
            Err(e) => self.console.framed([e])?,
        }

        Ok(())
    }

    fn logout(&mut self) -> Step<()> {
        if let Some(username) = self.session.logout() {
            self.console
                .framed([format!("Goodbye, {username}! You have been logged out.")])?;
        }

        Ok(())
    }

    fn enter_purchase(&mut self) -> Step<()> {
        let seller = self.console.ask(
            "Where did you buy the product? (Amazon, Ebay, Temu, etc...): ",
            |s| min_length("seller name", s),
        )?;
        let date = self.console.ask(
            "When did you buy the product? (DD/MM/YYYY or DD-MM-YYYY): ",
            validate::validate_date,
        )?;
        let item_name = self.console.ask("What's the name of the item you bought?: ", |s| {
            min_length("item name", s)
        })?;
        let cost = self
            .console
            .ask("How much did one unit cost? (in EUR): ", |s| validate::parse_amount("cost", s))?;
        let shipping = self
            .console
            .ask("How much was the delivery fee per unit? (in EUR): ", |s| {
                validate::parse_amount("delivery fee", s)
            })?;
        let weight = self
            .console
            .ask("How much does one unit weigh? (in kg): ", |s| validate::parse_amount("weight", s))?;
        let quantity = self
            .console
            .ask("How many units did you buy?: ", validate::parse_quantity)?;

        let purchase = match Purchase::new(seller, date, item_name, cost, shipping, weight, quantity) {
            Ok(purchase) => purchase,
            Err(e) => return Ok(self.console.framed([e])?),
        };
        match self.store.contains_purchase(&self.session, &purchase) {
            Ok(false) => {}
            Ok(true) => return Ok(self.console.framed(["This purchase data already exists!"])?),
            Err(e) => return Ok(self.console.framed([e])?),
        }

        self.console.framed([
            "Here's a summary of your purchase:".to_string(),
            describe_purchase(&purchase),
            format!(
                "Total: {:.2}€ for {:.2} kg.",
                purchase.total_cost(),
                purchase.total_weight()
            ),
        ])?;
        if !self.console.confirm("Are you sure you want to save this purchase?")? {
            return Ok(self.console.framed(["The purchase was discarded."])?);
        }

        let date = purchase.date();
        if let Err(e) = self.store.add_purchase(&self.session, purchase) {
            return Ok(self.console.framed([e])?);
        }
        self.save()?;
        self.console.framed([format!(
            "Saved purchase from {} successfully!",
            date.format("%d/%m/%Y")
        )])?;

        // the limit is informational, purchases are never blocked
        let (total, limit) = match self.store.current_account(&self.session) {
            Ok(account) => (account.total_spent(), account.spending_limit()),
            Err(e) => return Ok(self.console.framed([e])?),
        };
        if report::check_spending_limit(total, limit) {
            tracing::warn!(total, limit, "spending limit exceeded");
            self.console.framed([format!(
                "Warning: with {total:.2}€ in total you have exceeded your set limit of {limit:.2}€!"
            )])?;
        }

        Ok(())
    }

    fn full_report(&mut self) -> Step<()> {
        let (purchases, limit) = match self.store.current_account(&self.session) {
            Ok(account) => (account.purchases().to_vec(), account.spending_limit()),
            Err(e) => return Ok(self.console.framed([e])?),
        };
        let report = report::full_report(&purchases);
        if report.is_empty() {
            return Ok(self.console.framed(["You have not recorded any purchases yet."])?);
        }

        let mut lines = vec!["Here is a summary of your previous purchases:".to_string(), String::new()];
        lines.extend(describe_report(&report));
        lines.extend(describe_limit(LimitStatus::evaluate(report.total_cost, limit), limit));
        self.console.framed(lines)?;

        self.offer_purchase_list(&purchases)
    }

    fn filtered_report(&mut self) -> Step<()> {
        let purchases = match self.store.purchases(&self.session) {
            Ok(purchases) => purchases.to_vec(),
            Err(e) => return Ok(self.console.framed([e])?),
        };

        let criterion = match self
            .console
            .choose(&["filter for seller", "filter for date", "filter for item"])?
        {
            1 => Criterion::Seller(self.console.ask(
                "Please enter the seller you want to filter for: ",
                |s| Ok::<_, ValidationError>(s.to_string()),
            )?),
            2 => Criterion::Date(self.console.ask(
                "Please enter the date you want to filter for: ",
                validate::validate_date,
            )?),
            _ => Criterion::ItemName(self.console.ask(
                "Please enter the item you want to filter for: ",
                |s| Ok::<_, ValidationError>(s.to_string()),
            )?),
        };

        let filtered = report::filtered_report(&purchases, &criterion);
        if filtered.report.is_empty() {
            return Ok(self
                .console
                .framed([format!("No purchases found matching filter: {criterion}")])?);
        }

        let mut lines = vec![
            format!("Here is a summary of your previous purchases, filtered for {criterion}:"),
            String::new(),
        ];
        lines.extend(describe_report(&filtered.report));
        self.console.framed(lines)?;

        self.offer_purchase_list(&filtered.matches)
    }

    fn offer_purchase_list(&mut self, purchases: &[Purchase]) -> Step<()> {
        if !self.console.confirm("Do you want a list of all the purchases?")? {
            return Ok(());
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(true)
            .from_writer(&mut self.console.output);
        for purchase in purchases {
            writer.serialize(purchase)?;
        }
        writer.flush()?;

        Ok(())
    }

    fn set_spending_limit(&mut self) -> Step<()> {
        let limit = self.console.ask(
            "What do you want your limit to be? (in EUR, 0 for none): ",
            |s| validate::parse_amount("spending limit", s),
        )?;
        if let Err(e) = self.store.set_spending_limit(&self.session, limit) {
            return Ok(self.console.framed([e])?);
        }
        self.save()?;
        self.console
            .framed([format!("Spending limit set to {limit:.2}€.")])?;

        Ok(())
    }

    /// Writes the store to disk, failures are reported but not fatal
    fn save(&mut self) -> io::Result<()> {
        match self.store.persist(&self.data_path) {
            Ok(()) => self.console.framed([format!(
                "Successfully saved new data to file {}!",
                self.data_path.display()
            )]),
            Err(e) => {
                tracing::error!(error = %e, "failed to save user data");
                report_store_error(&mut self.console.output, &e)
            }
        }
    }
}

fn report_store_error<W: Write>(out: &mut W, error: &StoreError) -> io::Result<()> {
    framed(
        out,
        [
            format!("Error: {error}"),
            "Your changes are kept until the program ends, but were not saved.".to_string(),
        ],
    )
}

fn min_length(field: &'static str, candidate: &str) -> Result<String, ValidationError> {
    match candidate.chars().count() >= 3 {
        true => Ok(candidate.to_string()),
        false => Err(ValidationError::InvalidFormat {
            field,
            reason: "should be at least 3 characters".to_string(),
        }),
    }
}

fn describe_purchase(purchase: &Purchase) -> String {
    format!(
        "{} x {} at {} on {}, {:.2}€ + {:.2}€ delivery and {:.2} kg per unit",
        purchase.quantity(),
        purchase.item_name(),
        purchase.seller(),
        purchase.date().format("%d/%m/%Y"),
        purchase.cost(),
        purchase.shipping(),
        purchase.weight(),
    )
}

fn describe_report(report: &Report) -> Vec<String> {
    let mut lines = vec![
        format!(
            "You bought {} items for a total of: {:.2}€.",
            report.total_quantity, report.total_cost
        ),
        format!("With a total weight of: {:.2} kg.", report.total_weight),
        String::new(),
    ];
    if let Some(purchase) = &report.most_expensive {
        lines.push(format!(
            "Your most expensive purchase was: {} {} at {}",
            purchase.quantity(),
            purchase.item_name(),
            purchase.seller()
        ));
        lines.push(format!("for a total of {:.2}€.", purchase.total_cost()));
        lines.push(String::new());
    }
    if let Some(purchase) = &report.heaviest {
        lines.push(format!(
            "Your heaviest purchase was: {} {} at {}",
            purchase.quantity(),
            purchase.item_name(),
            purchase.seller()
        ));
        lines.push(format!("for a total of {:.2} kg.", purchase.total_weight()));
        lines.push(String::new());
    }
    lines.push(format!(
        "You did a total of {} purchases for a total of {} items.",
        report.purchase_count, report.total_quantity
    ));
    if let (Some(per_purchase), Some(per_item)) =
        (report.average_per_purchase(), report.average_per_item())
    {
        lines.push(format!(
            "On average you spent {per_purchase:.2}€ per purchase and {per_item:.2}€ per item."
        ));
    }

    lines
}

fn describe_limit(status: LimitStatus, limit: f64) -> Option<String> {
    match status {
        LimitStatus::Unset => None,
        LimitStatus::Reached => Some(format!("You have hit your set limit of {limit:.2}€!")),
        LimitStatus::Exceeded(by) => Some(format!(
            "You have exceeded your set limit of {limit:.2}€ by {by:.2}€!"
        )),
        LimitStatus::Remaining(left) => Some(format!(
            "You have {left:.2}€ left before reaching your set limit of {limit:.2}€!"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::Account;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("spending-tracker-shell-{}-{name}.json", std::process::id()))
    }

    fn alice() -> UserStore {
        let mut store = UserStore::new();
        store
            .add_user("alice", Account::new("Str0ng!Pass", "a@example.com", "+491234567890", 20.).unwrap())
            .unwrap();
        store
    }

    fn run(shell: Shell<&[u8], Vec<u8>>) -> (String, UserStore) {
        let mut shell = shell;
        shell.run().unwrap();
        let Shell { console, store, .. } = shell;
        (String::from_utf8(console.output).unwrap(), store)
    }

    #[test]
    fn framed_output() {
        let mut out = Vec::new();
        framed(&mut out, ["first", "second"]).unwrap();
        let rule = "-".repeat(70);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("{rule}\nfirst\nsecond\n{rule}\n"),
        );
    }

    #[test]
    fn register_and_reject_duplicate() {
        let path = temp_path("register");
        let input = "2\n\
                     alice\n\
                     weak\n\
                     Str0ng!Pass\n\
                     Str0ng!Pass\n\
                     not-an-email\n\
                     a@example.com\n\
                     +49 123 4567890\n\
                     100\n\
                     2\n\
                     alice\n";

        let (output, store) = run(Shell::new(input.as_bytes(), Vec::new(), &path));
        let saved = UserStore::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(output.contains("Password must"));
        assert!(output.contains("Invalid email"));
        assert!(output.contains("Successfully registered new user alice!"));
        assert!(output.contains("Username \"alice\" already exists"));
        assert!(output.contains("The program has ended."));

        let account = saved.account("alice").unwrap();
        assert_eq!(account.phone(), "+491234567890");
        assert_eq!(account.spending_limit(), 100.);
        assert_eq!(saved, store);
    }

    #[test]
    fn common_passwords_are_rejected() {
        let path = temp_path("common");
        let input = "2\nalice\nStr0ng!Pass\n";
        let shell = Shell::new(input.as_bytes(), Vec::new(), &path)
            .with_common_passwords(["str0ng!pass"].into_iter().collect());

        let (output, store) = run(shell);

        assert!(output.contains("not be too common"));
        assert!(store.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn three_wrong_passwords_return_to_menu() {
        let path = temp_path("wrong-passwords");
        let input = "1\nalice\nwrong\nnope\nstill wrong\n\
                     1\nalice\nStr0ng!Pass\n\
                     0\n";
        let shell = Shell::new(input.as_bytes(), Vec::new(), &path).with_store(alice());

        let (output, _) = run(shell);

        assert!(output.contains("Wrong password, 2 attempt(s) left."));
        assert!(output.contains("Wrong password, 1 attempt(s) left."));
        assert!(output.contains("Incorrect login credentials"));
        assert!(output.contains("Too many unsuccessful login attempts."));
        assert!(output.contains("Welcome, alice! Login successful!"));
        assert!(!path.exists());
    }

    #[test]
    fn attempt_limit_comes_from_session() {
        let path = temp_path("attempt-limit");
        let input = "1\nalice\nwrong\nStr0ng!Pass\n";
        let shell = Shell::new(input.as_bytes(), Vec::new(), &path)
            .with_store(alice())
            .with_session(Session::new(LoginPolicy {
                max_attempts: 1,
                ..LoginPolicy::default()
            }));

        let (output, _) = run(shell);

        assert!(output.contains("Too many unsuccessful login attempts."));
        assert!(!output.contains("Login successful"));
    }

    #[test]
    fn retry_delay_comes_from_login_policy() {
        let path = temp_path("retry-delay");
        let input = "1\nalice\nwrong\nStr0ng!Pass\n0\n";
        let shell = Shell::new(input.as_bytes(), Vec::new(), &path)
            .with_store(alice())
            .with_session(Session::new(LoginPolicy {
                max_attempts: 2,
                retry_delay: Duration::from_millis(10),
            }));

        let (output, _) = run(shell);

        let wait = output.find("Wait 0.01 seconds to retry.").unwrap();
        let last_prompt = output.rfind("Please enter your password: ").unwrap();
        assert!(wait < last_prompt);
        assert!(output.contains("Welcome, alice! Login successful!"));
    }

    #[test]
    fn invalid_utf8_input_is_asked_again() {
        let path = temp_path("invalid-utf8");
        let input: &[u8] = b"1\nalice\n\xff\xfe\nStr0ng!Pass\n0\n";
        let shell = Shell::new(input, Vec::new(), &path).with_store(alice());

        let (output, _) = run(shell);

        assert!(output.contains("The input is not valid UTF-8."));
        assert!(!output.contains("Wrong password"));
        assert!(output.contains("Welcome, alice! Login successful!"));
        assert!(output.contains("The program has ended."));
    }

    #[test]
    fn purchases_and_reports() {
        let path = temp_path("purchases");
        let input = "1\nalice\nStr0ng!Pass\n\
                     1\nShop\n31/04/2023\n01/01/2023\nBox\n10\n2\n1\n0\n2\ny\n\
                     2\ny\n\
                     3\n1\nOther\n\
                     3\n2\n2023-01-01\nn\n\
                     4\n-3\n50\n\
                     5\n\
                     0\n";
        let shell = Shell::new(input.as_bytes(), Vec::new(), &path).with_store(alice());

        let (output, store) = run(shell);
        let saved = UserStore::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(output.contains("Invalid date"));
        assert!(output.contains("Invalid quantity"));
        assert!(output.contains("Saved purchase from 01/01/2023 successfully!"));
        assert!(output.contains("exceeded your set limit of 20.00€"));
        assert!(output.contains("You bought 2 items for a total of: 24.00€."));
        assert!(output.contains("You have exceeded your set limit of 20.00€ by 4.00€!"));
        assert!(output.contains("seller,date,itemName,cost,shipping,weight,quantity\nShop,2023-01-01,Box,10.0,2.0,1.0,2\n"));
        assert!(output.contains("No purchases found matching filter: seller = Other"));
        assert!(output.contains("filtered for date = 01/01/2023"));
        assert!(output.contains("Spending limit set to 50.00€."));
        assert!(output.contains("Goodbye, alice!"));

        let account = saved.account("alice").unwrap();
        assert_eq!(account.purchases().len(), 1);
        assert_eq!(account.purchases()[0].total_cost(), 24.);
        assert_eq!(account.spending_limit(), 50.);
        assert_eq!(saved, store);
    }

    #[test]
    fn duplicate_purchase_is_not_saved_twice() {
        let path = temp_path("duplicate-purchase");
        let purchase = "1\nShop\n01/01/2023\nBox\n10\n2\n1\n2\ny\n";
        let input = format!("1\nalice\nStr0ng!Pass\n{purchase}{purchase}0\n");
        let shell = Shell::new(input.as_bytes(), Vec::new(), &path).with_store(alice());

        let mut shell = shell;
        shell.run().unwrap();
        let output = String::from_utf8(shell.console.output.clone()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(output.contains("This purchase data already exists!"));
        assert_eq!(shell.store().account("alice").unwrap().purchases().len(), 1);
    }

    #[test]
    fn empty_report_and_navigation() {
        let path = temp_path("navigation");
        let input = "7\n1\nalice\nStr0ng!Pass\n2\n3\nb\nq\n";
        let shell = Shell::new(input.as_bytes(), Vec::new(), &path).with_store(alice());

        let (output, _) = run(shell);

        assert!(output.contains("Invalid input. Please enter a valid number or command."));
        assert!(output.contains("You have not recorded any purchases yet."));
        assert!(output.contains("The program has ended."));
    }
}
