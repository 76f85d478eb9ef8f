mod dialogs;
mod editor;
mod icons;
mod info;
mod mixer;
mod top;
